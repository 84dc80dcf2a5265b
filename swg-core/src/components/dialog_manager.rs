//! Single-dialog orchestration

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use swg_activities::WindowHandle;
use tokio::task::JoinHandle;

use super::{Dialog, Graypane, View, ViewId};
use crate::error::CoreResult;
use crate::traits::Document;
use crate::types::DialogConfig;
use crate::utils::lock;

/// Stacking order of the scrim shown behind popup windows.
pub const POPUP_Z_INDEX: u32 = 2_147_483_647;

/// Time a successor view has to take over a completed view's dialog.
pub const COMPLETE_VIEW_GRACE_PERIOD: Duration = Duration::from_millis(100);

type OpenDialog = Shared<BoxFuture<'static, CoreResult<Arc<Dialog>>>>;

#[derive(Default)]
struct ManagerState {
    dialog: Option<Arc<Dialog>>,
    /// Shared by every caller while the dialog is opening or open.
    opening: Option<OpenDialog>,
    pending_closes: Vec<JoinHandle<()>>,
}

/// Owns the page's only dialog and the popup scrim.
///
/// Flows call [`open_view`](Self::open_view) for every surface they show;
/// consecutive views reuse the same dialog. Completing a view closes the
/// dialog only if no other view took it over within
/// [`COMPLETE_VIEW_GRACE_PERIOD`].
pub struct DialogManager {
    doc: Arc<dyn Document>,
    popup_graypane: Graypane,
    popup_win: Mutex<Option<WindowHandle>>,
    background_click_experiment: AtomicBool,
    state: Mutex<ManagerState>,
}

impl DialogManager {
    pub fn new(doc: Arc<dyn Document>) -> Arc<Self> {
        let popup_graypane = Graypane::new(Arc::clone(&doc), POPUP_Z_INDEX);

        let manager = Arc::new(Self {
            doc,
            popup_graypane,
            popup_win: Mutex::new(None),
            background_click_experiment: AtomicBool::new(false),
            state: Mutex::new(ManagerState::default()),
        });

        let weak = Arc::downgrade(&manager);
        manager.doc.add_click_listener(
            manager.popup_graypane.element(),
            Box::new(move || {
                if let Some(manager) = weak.upgrade() {
                    manager.focus_popup();
                }
            }),
        );
        manager
    }

    pub fn set_enable_background_click_experiment(&self, value: bool) {
        self.background_click_experiment
            .store(value, Ordering::Relaxed);
    }

    /// Opens the dialog, or joins the one already opening or open.
    ///
    /// `hidden` and `config` only apply when a new dialog is created.
    pub async fn open_dialog(&self, hidden: bool, config: DialogConfig) -> CoreResult<Arc<Dialog>> {
        let opening = {
            let mut state = lock(&self.state);
            if let Some(opening) = &state.opening {
                opening.clone()
            } else {
                let dialog = Dialog::new(Arc::clone(&self.doc), config);
                dialog.set_enable_background_click_experiment(
                    self.background_click_experiment.load(Ordering::Relaxed),
                );
                let opened = Arc::clone(&dialog);
                let opening = async move { opened.open(hidden).await.map(|()| opened) }
                    .boxed()
                    .shared();
                state.dialog = Some(dialog);
                state.opening = Some(opening.clone());
                opening
            }
        };
        opening.await
    }

    /// Shows `view` in the dialog, opening the dialog if needed.
    pub async fn open_view(
        self: &Arc<Self>,
        view: Arc<dyn View>,
        hidden: bool,
        config: DialogConfig,
    ) -> CoreResult<()> {
        self.watch_completion(Arc::clone(&view));
        let dialog = self.open_dialog(hidden, config).await?;
        dialog.open_view(view).await
    }

    fn watch_completion(self: &Arc<Self>, view: Arc<dyn View>) {
        let manager = Arc::downgrade(self);
        tokio::spawn(async move {
            let outcome = view.when_complete().await;
            let Some(manager) = manager.upgrade() else {
                return;
            };
            if let Err(e) = manager.handle_completion(view.id(), outcome) {
                if e.is_expected() {
                    log::warn!("View failed: {e}");
                } else {
                    log::error!("View failed: {e}");
                }
            }
        });
    }

    /// Waits for `view` to complete and reacts to how it ended.
    ///
    /// A cancellation completes the view and counts as success. Any other
    /// failure also completes the view but is returned to the caller.
    pub async fn handle_cancellations(self: &Arc<Self>, view: Arc<dyn View>) -> CoreResult<()> {
        let outcome = view.when_complete().await;
        self.handle_completion(view.id(), outcome)
    }

    fn handle_completion(self: &Arc<Self>, view: ViewId, outcome: CoreResult<()>) -> CoreResult<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(e) if e.is_cancel() => {
                log::debug!("View canceled: {e}");
                self.complete_view(Some(view));
                Ok(())
            }
            Err(e) => {
                self.complete_view(Some(view));
                Err(e)
            }
        }
    }

    /// Closes the dialog after the grace period if `view` is still the one
    /// it displays. `None` matches a dialog that shows no view.
    pub fn complete_view(self: &Arc<Self>, view: Option<ViewId>) {
        let mut state = lock(&self.state);
        let Some(dialog) = state.dialog.as_ref().map(Arc::downgrade) else {
            log::debug!("No dialog to complete");
            return;
        };

        let manager = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            tokio::time::sleep(COMPLETE_VIEW_GRACE_PERIOD).await;
            if let Some(manager) = manager.upgrade() {
                manager.close_if_showing(&dialog, view);
            }
        });
        state.pending_closes.retain(|task| !task.is_finished());
        state.pending_closes.push(task);
    }

    fn close_if_showing(&self, dialog: &Weak<Dialog>, view: Option<ViewId>) {
        let mut state = lock(&self.state);
        let showing = match (&state.dialog, dialog.upgrade()) {
            (Some(current), Some(dialog)) => {
                Arc::ptr_eq(current, &dialog) && dialog.current_view_id() == view
            }
            _ => false,
        };
        if showing {
            Self::close_locked(&mut state);
        }
    }

    /// Closes the dialog right away and removes the popup scrim.
    pub fn complete_all(&self) {
        {
            let mut state = lock(&self.state);
            for task in state.pending_closes.drain(..) {
                task.abort();
            }
            if state.dialog.is_some() {
                Self::close_locked(&mut state);
            }
        }
        if self.popup_graypane.is_attached() {
            self.popup_graypane.destroy();
        }
    }

    fn close_locked(state: &mut ManagerState) {
        state.opening = None;
        if let Some(dialog) = state.dialog.take() {
            tokio::spawn(async move { dialog.close(true).await });
        }
    }

    pub fn dialog(&self) -> Option<Arc<Dialog>> {
        lock(&self.state).dialog.clone()
    }

    /// Dims the page while a popup window is open.
    pub fn popup_opened(&self, target_win: Option<WindowHandle>) {
        *lock(&self.popup_win) = target_win;
        if !self.popup_graypane.is_attached() {
            self.popup_graypane.attach();
        }
        tokio::spawn(self.popup_graypane.show(true));
    }

    pub fn popup_closed(&self) {
        *lock(&self.popup_win) = None;
        drop(self.popup_graypane.hide(false));
    }

    fn focus_popup(&self) {
        let Some(win) = *lock(&self.popup_win) else {
            return;
        };
        if let Err(e) = self.doc.focus_window(win) {
            log::debug!("Failed to focus popup window: {e}");
        }
    }
}

//! Dialog shell hosting one view at a time
//!
//! The dialog is a friendly iframe docked at the bottom of the viewport (or
//! centered on desktop) with a scrim behind it. Every visual transition runs
//! through a single queue so that overlapping open, resize and close
//! animations never interleave on the shell element.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use futures::future::{BoxFuture, FutureExt, Shared};
use swg_activities::ElementHandle;

use super::{FriendlyIframe, Graypane, LoadingView, View, ViewId};
use crate::error::{CoreError, CoreResult};
use crate::traits::{Declarations, Document, ListenerId};
use crate::types::DialogConfig;
use crate::utils::animation::{transition, TRANSITION_CURVE, TRANSITION_DURATION};
use crate::utils::lock;
use crate::utils::url::origin_of;

/// Stacking order of the dialog shell. The scrim sits right below it.
pub const Z_INDEX: u32 = 2_147_483_647;

/// Viewports matching this query count as desktop.
pub const DESKTOP_MEDIA_QUERY: &str = "(min-width: 641px)";

/// Body class that prevents the page from scrolling behind the dialog.
pub const DISABLE_SCROLL_CLASS: &str = "swg-disable-scroll";

/// Extra page padding kept below a bottom-docked dialog.
const BOTTOM_PADDING_EXTRA: f64 = 20.0;

const ROOT_ELEMENT_IMPORTANT_STYLES: Declarations<'static> = &[
    ("min-height", "50px"),
    ("border", "none"),
    ("display", "block"),
    ("position", "fixed"),
    ("box-sizing", "border-box"),
];

/// Baseline applied to a view element before it is attached.
///
/// Zero width/height with 100% min/max works around iOS sizing of absolutely
/// positioned iframes.
const RESET_VIEW_STYLES: Declarations<'static> = &[
    ("position", "absolute"),
    ("top", "0"),
    ("left", "0"),
    ("right", "0"),
    ("bottom", "0"),
    ("opacity", "0"),
    ("height", "0"),
    ("max-height", "100%"),
    ("max-width", "100%"),
    ("min-height", "100%"),
    ("min-width", "100%"),
    ("width", "0"),
];

type Animation = Shared<BoxFuture<'static, ()>>;

#[derive(Default)]
struct DialogState {
    loading_view: Option<Arc<LoadingView>>,
    container: Option<ElementHandle>,
    view: Option<Arc<dyn View>>,
    /// Outgoing view kept on screen while the incoming one loads.
    previous_progress_view: Option<Arc<dyn View>>,
    hidden: bool,
    media_listener: Option<ListenerId>,
    background_listener: Option<ListenerId>,
}

pub struct Dialog {
    doc: Arc<dyn Document>,
    iframe: FriendlyIframe,
    graypane: Graypane,
    config: DialogConfig,
    background_click_experiment: AtomicBool,
    state: Mutex<DialogState>,
    /// Tail of the animation queue.
    animating: Mutex<Option<Animation>>,
    /// Bumped by every resize; lets superseded resizes detect themselves.
    animation_number: AtomicU64,
    weak_self: Weak<Dialog>,
}

impl Dialog {
    pub fn new(doc: Arc<dyn Document>, config: DialogConfig) -> Arc<Self> {
        let iframe = FriendlyIframe::new(Arc::clone(&doc), &config.iframe_class());
        let z_index = Z_INDEX.to_string();
        doc.set_styles(iframe.element(), ROOT_ELEMENT_IMPORTANT_STYLES, true);
        doc.set_styles(iframe.element(), &[("z-index", z_index.as_str())], true);

        let graypane = Graypane::new(Arc::clone(&doc), Z_INDEX - 1);

        Arc::new_cyclic(|weak_self| Self {
            doc,
            iframe,
            graypane,
            config,
            background_click_experiment: AtomicBool::new(false),
            state: Mutex::new(DialogState::default()),
            animating: Mutex::new(None),
            animation_number: AtomicU64::new(0),
            weak_self: weak_self.clone(),
        })
    }

    pub fn set_enable_background_click_experiment(&self, value: bool) {
        self.background_click_experiment
            .store(value, Ordering::Relaxed);
    }

    /// Attaches the shell and builds its content once the iframe has loaded.
    ///
    /// A hidden dialog stays invisible until its first view finishes
    /// initializing.
    pub async fn open(&self, hidden: bool) -> CoreResult<()> {
        if self.iframe.is_connected() {
            return Err(CoreError::AlreadyOpened);
        }

        // With the experiment on, the scrim swallows clicks instead of letting
        // them reach the page, and may close the dialog.
        if self.background_click_experiment.load(Ordering::Relaxed)
            && self.config.close_on_background_click.is_some()
        {
            let weak = self.weak_self.clone();
            let id = self.doc.add_click_listener(
                self.graypane.element(),
                Box::new(move || {
                    if let Some(dialog) = weak.upgrade() {
                        dialog.on_graypane_click();
                    }
                }),
            );
            lock(&self.state).background_listener = Some(id);
        }

        if let Some(body) = self.doc.body() {
            self.doc.append_child(body, self.element());
        }
        self.graypane.attach();

        if hidden {
            self.doc.set_styles(
                self.element(),
                &[("visibility", "hidden"), ("opacity", "0")],
                true,
            );
            lock(&self.state).hidden = true;
        } else {
            self.show();
        }

        self.iframe.when_ready().await;
        self.build_iframe()
    }

    fn build_iframe(&self) -> CoreResult<()> {
        let body = self.iframe.body()?;

        let classes: &[&str] = if self.is_position_center_on_desktop() {
            &["centered-on-desktop"]
        } else {
            &[]
        };
        let loading_view = Arc::new(LoadingView::new(Arc::clone(&self.doc), classes));
        self.doc.append_child(body, loading_view.element());

        // Holds every view, including third-party iframes.
        let container = self.doc.create_element("swg-container", &[]);
        self.doc.append_child(body, container);

        {
            let mut state = lock(&self.state);
            state.loading_view = Some(loading_view);
            state.container = Some(container);
        }
        self.set_position();

        if self.is_position_center_on_desktop() {
            let weak = self.weak_self.clone();
            let id = self.doc.add_media_listener(
                DESKTOP_MEDIA_QUERY,
                Box::new(move |_| {
                    if let Some(dialog) = weak.upgrade() {
                        dialog.set_position();
                    }
                }),
            );
            lock(&self.state).media_listener = Some(id);
        }
        Ok(())
    }

    /// Slides the shell out (fades it when centered), then detaches it.
    pub async fn close(&self, animated: bool) {
        let animating = animated.then(|| {
            let centered = self.should_position_center();
            self.animate(move |dialog| async move {
                let props = if centered {
                    [("opacity", "0")]
                } else {
                    [("transform", "translateY(100%)")]
                };
                futures::join!(
                    dialog.graypane.hide(true),
                    transition(
                        dialog.doc.as_ref(),
                        dialog.element(),
                        &props,
                        TRANSITION_DURATION,
                        TRANSITION_CURVE,
                    )
                );
                Ok(())
            })
        });

        if let Some(body) = self.doc.body() {
            self.doc.remove_class(body, DISABLE_SCROLL_CLASS);
        }

        if let Some(animating) = animating {
            animating.await;
        }

        self.doc.remove_element(self.element());
        self.remove_padding_to_html();
        self.graypane.destroy();

        let (media_listener, background_listener) = {
            let mut state = lock(&self.state);
            (state.media_listener.take(), state.background_listener.take())
        };
        if let Some(id) = media_listener {
            self.doc.remove_media_listener(id);
        }
        if let Some(id) = background_listener {
            self.doc.remove_click_listener(id);
        }
    }

    /// Element that holds the views. Available once [`open`](Self::open) resolved.
    pub fn container(&self) -> CoreResult<ElementHandle> {
        lock(&self.state).container.ok_or(CoreError::NotOpened)
    }

    pub fn iframe(&self) -> &FriendlyIframe {
        &self.iframe
    }

    /// The shell iframe element.
    pub fn element(&self) -> ElementHandle {
        self.iframe.element()
    }

    pub fn graypane(&self) -> &Graypane {
        &self.graypane
    }

    pub fn loading_view(&self) -> Option<Arc<LoadingView>> {
        lock(&self.state).loading_view.clone()
    }

    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    pub fn max_allowed_height_ratio(&self) -> f64 {
        self.config.max_allowed_height_ratio
    }

    pub fn is_position_center_on_desktop(&self) -> bool {
        self.config.desktop_config.is_center_positioned
    }

    pub fn is_hidden(&self) -> bool {
        lock(&self.state).hidden
    }

    pub fn current_view(&self) -> Option<Arc<dyn View>> {
        lock(&self.state).view.clone()
    }

    pub fn current_view_id(&self) -> Option<ViewId> {
        lock(&self.state).view.as_ref().map(|view| view.id())
    }

    /// Replaces the current view with `view`.
    ///
    /// The outgoing view stays on top while the new one initializes if it
    /// renders its own progress indicator; otherwise the shared loading
    /// indicator covers the swap.
    pub async fn open_view(self: &Arc<Self>, view: Arc<dyn View>) -> CoreResult<()> {
        let element = view.element();
        self.doc.set_styles(element, RESET_VIEW_STYLES, true);
        self.entry_transition_to_next_view()?;

        let container = self.container()?;
        lock(&self.state).view = Some(Arc::clone(&view));
        self.doc.append_child(container, element);

        if self.config.should_disable_body_scrolling {
            if let Some(body) = self.doc.body() {
                self.doc.add_class(body, DISABLE_SCROLL_CLASS);
            }
        }

        if view.should_fade_body() && !self.is_hidden() {
            tokio::spawn(self.graypane.show(view.should_animate_fade()));
        }

        view.init(Arc::clone(self)).await?;

        self.doc.set_styles(element, &[("opacity", "1")], true);
        if self.is_hidden() {
            if view.should_fade_body() {
                tokio::spawn(self.graypane.show(view.should_animate_fade()));
            }
            self.show();
        }
        self.exit_transition_from_old_view();
        Ok(())
    }

    fn entry_transition_to_next_view(&self) -> CoreResult<()> {
        let container = self.container()?;
        let loading_view = {
            let mut state = lock(&self.state);
            match state.view.clone() {
                Some(view) if view.has_loading_indicator() => {
                    state.previous_progress_view = Some(view);
                    return Ok(());
                }
                _ => state.loading_view.clone(),
            }
        };
        self.doc.remove_children(container);
        if let Some(loading_view) = loading_view {
            loading_view.show();
        }
        Ok(())
    }

    fn exit_transition_from_old_view(&self) {
        let (previous, loading_view) = {
            let mut state = lock(&self.state);
            (state.previous_progress_view.take(), state.loading_view.clone())
        };
        if let Some(previous) = previous {
            self.doc.remove_element(previous.element());
        } else if let Some(loading_view) = loading_view {
            loading_view.hide();
        }
    }

    /// Slides the shell in and focuses it.
    fn show(&self) {
        let animating = self.animate(|dialog| async move {
            let element = dialog.element();
            dialog.doc.set_styles(
                element,
                &[
                    ("transform", "translateY(100%)"),
                    ("opacity", "1"),
                    ("visibility", "visible"),
                ],
                true,
            );
            transition(
                dialog.doc.as_ref(),
                element,
                &[
                    ("transform", dialog.default_translate_y()),
                    ("opacity", "1"),
                    ("visibility", "visible"),
                ],
                TRANSITION_DURATION,
                TRANSITION_CURVE,
            )
            .await;
            dialog.doc.focus(element);
            Ok(())
        });
        // The queue drives it; nobody waits for the entrance.
        drop(animating);
        lock(&self.state).hidden = false;
    }

    fn on_graypane_click(&self) {
        if self.config.close_on_background_click != Some(true) {
            return;
        }
        let Some(view) = self.current_view() else {
            return;
        };
        let frame = view.element();
        let origin = self
            .doc
            .attribute(frame, "src")
            .and_then(|src| origin_of(&src))
            .unwrap_or_else(|| "*".to_string());
        // The view's document must listen for this message.
        self.doc.post_message(frame, "close", &origin);
    }

    /// Resizes the shell to fit `height` requested by the view `view_id`.
    ///
    /// Requests from a view that is no longer current are ignored. Growing
    /// sets the height first and then slides into place; shrinking slides
    /// first and only then sets the height, so content is never clipped.
    /// A resize superseded by a newer one skips its remaining effects but
    /// still returns normally.
    pub async fn resize_view(&self, view_id: ViewId, height: f64, animated: bool) {
        let Some(view) = self.current_view().filter(|view| view.id() == view_id) else {
            log::debug!("Ignoring resize request from a view that is not displayed");
            return;
        };
        let new_height = self.max_allowed_height(height);

        let animation_number = self.animation_number.fetch_add(1, Ordering::SeqCst) + 1;
        let is_stale =
            move |dialog: &Dialog| animation_number != dialog.animation_number.load(Ordering::SeqCst);

        if animated {
            let old_height = self.doc.offset_height(self.element());
            let animating = if new_height >= old_height {
                self.animate(move |dialog| async move {
                    if is_stale(dialog.as_ref()) {
                        return Ok(());
                    }
                    let element = dialog.element();
                    let height = format!("{new_height}px");
                    if dialog.should_position_center() {
                        dialog
                            .doc
                            .set_styles(element, &[("height", height.as_str())], true);
                    } else {
                        let offset = format!("translateY({}px)", new_height - old_height);
                        dialog.doc.set_styles(
                            element,
                            &[("height", height.as_str()), ("transform", offset.as_str())],
                            true,
                        );
                    }

                    // Slide on the next frame without holding the queue.
                    let doc = Arc::clone(&dialog.doc);
                    let translate = dialog.default_translate_y();
                    tokio::spawn(async move {
                        transition(
                            doc.as_ref(),
                            element,
                            &[("transform", translate)],
                            TRANSITION_DURATION,
                            TRANSITION_CURVE,
                        )
                        .await;
                    });
                    Ok(())
                })
            } else {
                self.animate(move |dialog| async move {
                    let element = dialog.element();
                    if !is_stale(dialog.as_ref()) {
                        let transform = if dialog.should_position_center() {
                            dialog.default_translate_y().to_string()
                        } else {
                            format!("translateY({}px)", old_height - new_height)
                        };
                        transition(
                            dialog.doc.as_ref(),
                            element,
                            &[("transform", transform.as_str())],
                            TRANSITION_DURATION,
                            TRANSITION_CURVE,
                        )
                        .await;
                    }
                    if is_stale(dialog.as_ref()) {
                        return Ok(());
                    }
                    let height = format!("{new_height}px");
                    dialog.doc.set_styles(
                        element,
                        &[
                            ("height", height.as_str()),
                            ("transform", dialog.default_translate_y()),
                        ],
                        true,
                    );
                    Ok(())
                })
            };
            animating.await;
        } else {
            let height = format!("{new_height}px");
            self.doc
                .set_styles(self.element(), &[("height", height.as_str())], true);
        }

        if is_stale(self) {
            return;
        }

        self.update_padding_to_html(height);
        view.resized();
    }

    /// Queues `callback` behind the running animation.
    ///
    /// The queue runs on its own task; the returned future resolves once
    /// `callback` has finished. Callback errors are logged and dropped so a
    /// failed animation never blocks the ones queued after it.
    pub(crate) fn animate<F, Fut>(&self, callback: F) -> Animation
    where
        F: FnOnce(Arc<Dialog>) -> Fut + Send + 'static,
        Fut: Future<Output = CoreResult<()>> + Send + 'static,
    {
        let weak = self.weak_self.clone();
        let mut animating = lock(&self.animating);
        let previous = animating.take();
        let next = async move {
            if let Some(previous) = previous {
                previous.await;
            }
            let Some(dialog) = weak.upgrade() else {
                return;
            };
            if let Err(e) = callback(dialog).await {
                log::debug!("Dialog animation failed: {e}");
            }
        }
        .boxed()
        .shared();
        *animating = Some(next.clone());
        drop(animating);

        tokio::spawn(next.clone());
        next
    }

    fn max_allowed_height(&self, height: f64) -> f64 {
        height.min(self.doc.viewport_height() * self.config.max_allowed_height_ratio)
    }

    /// Keeps page content reachable below a bottom-docked dialog.
    fn update_padding_to_html(&self, height: f64) {
        if self.should_position_center() {
            self.remove_padding_to_html();
            return;
        }
        let padding = format!("{}px", height + BOTTOM_PADDING_EXTRA);
        self.doc.set_styles(
            self.doc.root_element(),
            &[("padding-bottom", padding.as_str())],
            true,
        );
    }

    fn remove_padding_to_html(&self) {
        self.doc
            .remove_style(self.doc.root_element(), "padding-bottom");
    }

    fn set_position(&self) {
        let top = if self.should_position_center() {
            "50%"
        } else {
            "auto"
        };
        self.doc.set_styles(
            self.element(),
            &[
                ("top", top),
                ("bottom", "0"),
                ("transform", self.default_translate_y()),
            ],
            true,
        );
    }

    /// Centered only when configured and the viewport is desktop sized.
    pub fn should_position_center(&self) -> bool {
        self.is_position_center_on_desktop() && self.doc.matches_media(DESKTOP_MEDIA_QUERY)
    }

    fn default_translate_y(&self) -> &'static str {
        if self.should_position_center() {
            "translateY(-50%)"
        } else {
            "translateY(0px)"
        }
    }
}

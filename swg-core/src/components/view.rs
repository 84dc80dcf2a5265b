//! Displayable surface abstraction

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use swg_activities::ElementHandle;

use super::Dialog;
use crate::error::CoreResult;

/// Identity of a view instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

impl ViewId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A surface a [`Dialog`] can display.
///
/// The dialog only ever talks to views through this trait: it reads the
/// display hints, attaches [`View::element`], runs [`View::init`] and tells the
/// view when a resize it requested has been applied.
#[async_trait]
pub trait View: Send + Sync {
    fn id(&self) -> ViewId;

    fn element(&self) -> ElementHandle;

    /// Load the view's content. The dialog may be used to request resizes.
    async fn init(&self, dialog: Arc<Dialog>) -> CoreResult<()>;

    /// Whether the page behind the dialog should be dimmed.
    fn should_fade_body(&self) -> bool;

    /// Whether the view renders its own progress indicator.
    fn has_loading_indicator(&self) -> bool;

    fn should_animate_fade(&self) -> bool {
        false
    }

    /// Resolves when the flow behind the view has finished.
    async fn when_complete(&self) -> CoreResult<()>;

    /// Called after a resize requested by the view has been applied.
    fn resized(&self);
}

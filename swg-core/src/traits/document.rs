//! Host document abstraction Trait

use async_trait::async_trait;
use swg_activities::{ElementHandle, WindowHandle};

use crate::error::CoreResult;

/// Style or attribute list: `(name, value)` pairs applied in order.
pub type Declarations<'a> = &'a [(&'a str, &'a str)];

/// Click listener attached to an element.
pub type ClickHandler = Box<dyn Fn() + Send + Sync>;

/// Media query listener, called with the new match state.
pub type MediaListener = Box<dyn Fn(bool) + Send + Sync>;

/// Handle returned when a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The publisher page as seen by the runtime.
///
/// Elements are addressed through opaque [`ElementHandle`]s. Elements living
/// inside a same-origin ("friendly") iframe are created through the same
/// document and attached under [`Document::frame_body`].
///
/// Platform implementations:
/// - Browser: a `web-sys` binding over the top-level `Document`
/// - Tests: an in-memory tree that records every style mutation
#[async_trait]
pub trait Document: Send + Sync {
    /// Create a detached element.
    fn create_element(&self, tag: &str, attributes: Declarations<'_>) -> ElementHandle;

    /// The `<body>` element, if the page has one.
    fn body(&self) -> Option<ElementHandle>;

    /// The `<html>` element.
    fn root_element(&self) -> ElementHandle;

    fn append_child(&self, parent: ElementHandle, child: ElementHandle);

    /// Detach an element from its parent. No-op when already detached.
    fn remove_element(&self, element: ElementHandle);

    fn remove_children(&self, element: ElementHandle);

    /// Whether the element is attached to the live document.
    fn is_connected(&self, element: ElementHandle) -> bool;

    fn attribute(&self, element: ElementHandle, name: &str) -> Option<String>;

    /// Apply inline styles. `important` maps to the `!important` priority.
    fn set_styles(&self, element: ElementHandle, styles: Declarations<'_>, important: bool);

    fn style(&self, element: ElementHandle, name: &str) -> Option<String>;

    fn remove_style(&self, element: ElementHandle, name: &str);

    fn add_class(&self, element: ElementHandle, class: &str);

    fn remove_class(&self, element: ElementHandle, class: &str);

    /// Rendered height of the element in CSS pixels.
    fn offset_height(&self, element: ElementHandle) -> f64;

    /// `window.innerHeight`
    fn viewport_height(&self) -> f64;

    fn matches_media(&self, query: &str) -> bool;

    fn add_media_listener(&self, query: &str, listener: MediaListener) -> ListenerId;

    fn remove_media_listener(&self, id: ListenerId);

    fn add_click_listener(&self, element: ElementHandle, handler: ClickHandler) -> ListenerId;

    fn remove_click_listener(&self, id: ListenerId);

    fn focus(&self, element: ElementHandle);

    /// Bring a popup window to the front.
    fn focus_window(&self, window: WindowHandle) -> CoreResult<()>;

    /// `postMessage` into the content window of an iframe.
    fn post_message(&self, frame: ElementHandle, message: &str, target_origin: &str);

    /// Resolves once the iframe fired its `load` event.
    async fn when_loaded(&self, frame: ElementHandle);

    /// Body of a loaded same-origin iframe.
    fn frame_body(&self, frame: ElementHandle) -> Option<ElementHandle>;
}

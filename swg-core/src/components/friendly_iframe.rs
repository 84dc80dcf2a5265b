//! Same-origin iframe shell

use std::sync::Arc;

use swg_activities::ElementHandle;

use crate::error::{CoreError, CoreResult};
use crate::traits::Document;

/// An `about:blank` iframe whose document the runtime builds itself.
pub struct FriendlyIframe {
    doc: Arc<dyn Document>,
    element: ElementHandle,
}

impl FriendlyIframe {
    pub fn new(doc: Arc<dyn Document>, class: &str) -> Self {
        let element = doc.create_element(
            "iframe",
            &[
                ("frameborder", "0"),
                ("scrolling", "no"),
                ("src", "about:blank"),
                ("class", class),
            ],
        );
        Self { doc, element }
    }

    pub async fn when_ready(&self) {
        self.doc.when_loaded(self.element).await;
    }

    pub fn element(&self) -> ElementHandle {
        self.element
    }

    /// Body of the iframe document. Fails until the iframe has loaded.
    pub fn body(&self) -> CoreResult<ElementHandle> {
        self.doc
            .frame_body(self.element)
            .ok_or_else(|| CoreError::DocumentError("not loaded".to_string()))
    }

    pub fn is_connected(&self) -> bool {
        self.doc.is_connected(self.element)
    }
}

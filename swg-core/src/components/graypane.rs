//! Full-viewport dimming scrim

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use swg_activities::ElementHandle;

use crate::traits::Document;
use crate::utils::animation::{transition, TRANSITION_CURVE, TRANSITION_DURATION};

/// Dims the publisher page behind a dialog or a popup.
#[derive(Clone)]
pub struct Graypane {
    doc: Arc<dyn Document>,
    element: ElementHandle,
}

impl Graypane {
    pub fn new(doc: Arc<dyn Document>, z_index: u32) -> Self {
        let element = doc.create_element("swg-popup-background", &[("role", "button")]);
        let z_index = z_index.to_string();
        doc.set_styles(
            element,
            &[
                ("z-index", z_index.as_str()),
                ("display", "none"),
                ("position", "fixed"),
                ("top", "0"),
                ("right", "0"),
                ("bottom", "0"),
                ("left", "0"),
                ("background-color", "rgba(32, 33, 36, .6)"),
            ],
            true,
        );
        Self { doc, element }
    }

    pub fn element(&self) -> ElementHandle {
        self.element
    }

    pub fn is_attached(&self) -> bool {
        self.doc.is_connected(self.element)
    }

    pub fn attach(&self) {
        if let Some(body) = self.doc.body() {
            self.doc.append_child(body, self.element);
        }
    }

    pub fn destroy(&self) {
        self.doc.remove_element(self.element);
    }

    /// Makes the scrim visible right away.
    ///
    /// With `animated`, it starts transparent and the returned future plays
    /// the fade-in. Otherwise the returned future is already complete.
    pub fn show(&self, animated: bool) -> BoxFuture<'static, ()> {
        self.doc.set_styles(
            self.element,
            &[("display", "block"), ("opacity", if animated { "0" } else { "1" })],
            true,
        );
        if !animated {
            return futures::future::ready(()).boxed();
        }
        let doc = Arc::clone(&self.doc);
        let element = self.element;
        async move {
            transition(
                doc.as_ref(),
                element,
                &[("opacity", "1")],
                TRANSITION_DURATION,
                TRANSITION_CURVE,
            )
            .await;
        }
        .boxed()
    }

    /// Hides the scrim, right away or after a fade-out.
    pub fn hide(&self, animated: bool) -> BoxFuture<'static, ()> {
        if !animated {
            self.doc.set_styles(self.element, &[("display", "none")], true);
            return futures::future::ready(()).boxed();
        }
        let doc = Arc::clone(&self.doc);
        let element = self.element;
        async move {
            transition(
                doc.as_ref(),
                element,
                &[("opacity", "0")],
                TRANSITION_DURATION,
                TRANSITION_CURVE,
            )
            .await;
            doc.set_styles(element, &[("display", "none")], true);
        }
        .boxed()
    }
}

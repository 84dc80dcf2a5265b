//! Shared loading indicator

use std::sync::Arc;

use swg_activities::ElementHandle;

use crate::traits::Document;

/// Loading indicator shown inside the dialog while a view initializes.
pub struct LoadingView {
    doc: Arc<dyn Document>,
    container: ElementHandle,
}

impl LoadingView {
    pub fn new(doc: Arc<dyn Document>, additional_classes: &[&str]) -> Self {
        let container = doc.create_element("swg-loading-container", &[]);
        for class in additional_classes {
            doc.add_class(container, class);
        }

        let loading = doc.create_element("swg-loading", &[]);
        doc.append_child(container, loading);

        let animate = doc.create_element("swg-loading-animate", &[]);
        doc.append_child(loading, animate);
        let image = doc.create_element("swg-loading-image", &[]);
        doc.append_child(animate, image);

        doc.set_styles(container, &[("display", "none")], true);
        Self { doc, container }
    }

    pub fn element(&self) -> ElementHandle {
        self.container
    }

    pub fn show(&self) {
        self.doc.remove_style(self.container, "display");
    }

    pub fn hide(&self) {
        self.doc.set_styles(self.container, &[("display", "none")], true);
    }

    pub fn is_shown(&self) -> bool {
        self.doc.style(self.container, "display").as_deref() != Some("none")
    }
}

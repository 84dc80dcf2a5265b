//! Configuration type definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Publication identity read from the publisher page markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConfig {
    pub publication_id: Option<String>,
    pub product_id: Option<String>,
}

/// Values injected into every activity as default arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientContext {
    pub page: PageConfig,
    /// Serialized analytics context forwarded as `analyticsContext`
    pub analytics_context: Value,
    /// Runtime version reported as `_client`
    pub runtime_version: String,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            analytics_context: Value::Array(Vec::new()),
            runtime_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Display configuration for dialogs on desktop screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesktopDialogConfig {
    /// Center the dialog in the viewport instead of docking it at the bottom.
    pub is_center_positioned: bool,
    /// Allow the 808px wide layout on viewports >= 870px.
    pub supports_wide_screen: bool,
}

/// Display configuration for dialogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogConfig {
    pub desktop_config: DesktopDialogConfig,
    /// Max view height as a ratio of the viewport height.
    pub max_allowed_height_ratio: f64,
    /// Replaces the default `swg-dialog` classes of the shell iframe.
    pub iframe_css_class_override: Option<String>,
    pub should_disable_body_scrolling: bool,
    /// `None` keeps the legacy scrim behavior even with the background click
    /// experiment enabled.
    pub close_on_background_click: Option<bool>,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            desktop_config: DesktopDialogConfig::default(),
            max_allowed_height_ratio: 0.9,
            iframe_css_class_override: None,
            should_disable_body_scrolling: false,
            close_on_background_click: None,
        }
    }
}

impl DialogConfig {
    /// Class attribute of the dialog shell iframe.
    pub fn iframe_class(&self) -> String {
        if let Some(class) = &self.iframe_css_class_override {
            return class.clone();
        }
        if self.desktop_config.supports_wide_screen {
            "swg-dialog swg-wide-dialog".to_string()
        } else {
            "swg-dialog".to_string()
        }
    }
}

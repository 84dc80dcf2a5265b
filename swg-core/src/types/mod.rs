//! Type definition module

mod config;
mod event;
pub mod messages;

pub use config::{ClientContext, DesktopDialogConfig, DialogConfig, PageConfig};
pub use event::{ClientEvent, EventOriginator};
pub use messages::{Message, MessageKind};

// Re-export transport types
pub use swg_activities::{
    ActivityMode, ActivityOpenOptions, ActivityResult, ActivityResultCode, Args, ElementHandle,
    OpenedWindow, WindowHandle,
};

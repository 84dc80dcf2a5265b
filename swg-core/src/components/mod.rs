//! UI components: activity channels, dialog and views

mod activities;
mod activity_iframe_view;
mod dialog;
mod dialog_manager;
mod friendly_iframe;
mod graypane;
mod loading_view;
mod view;

pub use activities::{ActivityIframePort, ActivityPorts, ActivityWindowPort};
pub use activity_iframe_view::{ActivityIframeView, ViewOptions};
pub use dialog::{Dialog, DESKTOP_MEDIA_QUERY, DISABLE_SCROLL_CLASS, Z_INDEX};
pub use dialog_manager::{DialogManager, COMPLETE_VIEW_GRACE_PERIOD, POPUP_Z_INDEX};
pub use friendly_iframe::FriendlyIframe;
pub use graypane::Graypane;
pub use loading_view::LoadingView;
pub use view::{View, ViewId};

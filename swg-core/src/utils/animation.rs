//! CSS transition helper

use std::time::Duration;

use swg_activities::ElementHandle;

use crate::traits::{Declarations, Document};

/// Duration used by every dialog and scrim transition.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(300);

/// Timing function used by every dialog and scrim transition.
pub const TRANSITION_CURVE: &str = "ease-out";

/// Animate `props` on `element` and resolve once the transition has played.
///
/// The element's previous `transition` value is restored afterwards.
pub async fn transition(
    doc: &dyn Document,
    element: ElementHandle,
    props: Declarations<'_>,
    duration: Duration,
    curve: &str,
) {
    let previous = doc.style(element, "transition").unwrap_or_default();

    // Let the current styles render before the transition starts.
    tokio::task::yield_now().await;

    let timing = format!("{}ms {curve}", duration.as_millis());
    let transition_value = format!("transform {timing}, opacity {timing}");
    let mut styles = Vec::with_capacity(props.len() + 1);
    styles.push(("transition", transition_value.as_str()));
    styles.extend_from_slice(props);
    doc.set_styles(element, &styles, true);

    tokio::time::sleep(duration).await;

    doc.set_styles(element, &[("transition", previous.as_str())], true);
}

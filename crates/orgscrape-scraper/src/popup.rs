use std::time::Duration;

use crate::selectors::OVERLAY_DISMISS;
use crate::session::PageSession;

/// Closes the sign-in overlay if it shows up within `wait`.
///
/// Returns whether the overlay was dismissed. Absence, a failed click, or a
/// lost session are all logged and otherwise ignored; later stages report
/// their own failures.
pub async fn dismiss_overlay(page: &dyn PageSession, target: &str, wait: Duration) -> bool {
    let button = match page.wait_for(OVERLAY_DISMISS, wait).await {
        Ok(button) => button,
        Err(e) => {
            tracing::debug!(target, error = %e, "no sign-in overlay to dismiss");
            return false;
        }
    };

    match button.click().await {
        Ok(()) => {
            tracing::debug!(target, "dismissed sign-in overlay");
            true
        }
        Err(e) => {
            tracing::warn!(target, error = %e, "failed to dismiss sign-in overlay");
            false
        }
    }
}

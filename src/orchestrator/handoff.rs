//! Authorization hand-off.
//!
//! Leaving for the backend's OAuth flow is a browser navigation, not a session
//! transition: the URL is opened externally and the user reloads once it is done.

use crate::model::{Handoff, InfoEvent};
use tracing::{info, warn};

/// Send the user to the authorization page and describe what happened.
pub(crate) fn hand_off(handoff: &Handoff, open_browser: bool) -> InfoEvent {
    let url = handoff.url.to_string();
    if !open_browser {
        return InfoEvent::Message(format!("Visit {url} to authorize, then reload"));
    }
    match open::that_detached(&url) {
        Ok(()) => {
            info!(%url, "opened browser");
            InfoEvent::OpenedBrowser { url }
        }
        Err(e) => {
            warn!(%url, error = %e, "could not open browser");
            InfoEvent::OpenBrowserFailed {
                url,
                reason: e.to_string(),
            }
        }
    }
}

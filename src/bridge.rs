use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::sync::{SyncController, MSG_UPDATING};

/// Message type tag the upload surface posts after a successful save.
pub const UPLOAD_EVENT: &str = "album:uploaded";

// Hostname fragments trusted in a message origin: the upload provider's
// script host and its user-content domain.
const TRUSTED_ORIGIN_HOSTS: [&str; 2] = ["script.google.com", "googleusercontent.com"];

/// Delay between an accepted notification and the refresh it schedules.
/// The upload surface saves and then redirects; polling immediately would
/// race the remote write.
pub const REFRESH_DELAY: Duration = Duration::from_secs(1);

/// Validates cross-origin messages from the embedded upload surface and
/// turns accepted ones into a delayed refresh. Anything it cannot
/// positively classify as the expected notification is silently ignored;
/// the bridge has no failure path.
pub struct UploadBridge {
    controller: Arc<SyncController>,
    delay: Duration,
}

impl UploadBridge {
    pub fn new(controller: Arc<SyncController>) -> Self {
        Self { controller, delay: REFRESH_DELAY }
    }

    #[cfg(test)]
    fn with_delay(controller: Arc<SyncController>, delay: Duration) -> Self {
        Self { controller, delay }
    }

    /// Handle one inbound message. Returns whether it was accepted.
    pub fn handle_message(&self, origin: &str, payload: &Value) -> bool {
        if !origin_trusted(origin) {
            return false;
        }
        if !is_upload_notice(payload) {
            return false;
        }
        debug!(%origin, "upload notification accepted");
        self.controller.set_message(MSG_UPDATING);
        self.controller.schedule_refresh(self.delay);
        true
    }
}

fn origin_trusted(origin: &str) -> bool {
    TRUSTED_ORIGIN_HOSTS.iter().any(|host| origin.contains(host))
}

/// Either the bare tag string or an object whose `type` field carries it.
fn is_upload_notice(payload: &Value) -> bool {
    match payload {
        Value::String(tag) => tag == UPLOAD_EVENT,
        Value::Object(map) => map.get("type").and_then(Value::as_str) == Some(UPLOAD_EVENT),
        _ => false,
    }
}

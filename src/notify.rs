//! Best-effort push notification dispatch.
//!
//! Delivery is a side effect of a state transition, never part of it: every
//! failure here is logged at `warn` and swallowed, and no caller ever rolls
//! back because a push did not land.

use serde_json::json;

use crate::config::Config;
use crate::models::bookings::Status;

/// Longest message preview included in a chat push.
pub const MESSAGE_PREVIEW_MAX: usize = 100;

/// Customer-facing copy for each booking status change.
pub fn status_notification(status: Status) -> Option<(&'static str, &'static str)> {
    match status {
        Status::Confirmed => Some((
            "Booking Confirmed! ✅",
            "Your service provider has accepted your request.",
        )),
        Status::InProgress => Some(("Job Started 🛠️", "Your service has started!")),
        Status::Completed => Some((
            "Job Completed 🎉",
            "Service is done! Please review and pay.",
        )),
        Status::Cancelled => Some(("Booking Cancelled ❌", "Your booking was cancelled.")),
        Status::Pending => None,
    }
}

/// First `MESSAGE_PREVIEW_MAX` characters of a message body.
pub fn truncate_preview(text: &str) -> String {
    text.chars().take(MESSAGE_PREVIEW_MAX).collect()
}

/// Thin client for the push gateway. Constructed once at startup and shared
/// as actix app data; a missing gateway URL turns every send into a no-op
/// (useful in development).
#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    gateway_url: Option<String>,
    server_key: Option<String>,
}

impl Notifier {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            gateway_url: config.push_gateway_url.clone(),
            server_key: config.push_server_key.clone(),
        }
    }

    /// Deliver one push to a device token. Best-effort: failures are logged
    /// and swallowed.
    pub async fn send(&self, push_token: &str, title: &str, body: &str, data: serde_json::Value) {
        let Some(url) = self.gateway_url.as_deref() else {
            tracing::debug!("push gateway not configured, dropping notification");
            return;
        };

        let payload = json!({
            "to": push_token,
            "notification": { "title": title, "body": body },
            "data": data,
        });

        let mut request = self.client.post(url).json(&payload);
        if let Some(key) = self.server_key.as_deref() {
            request = request.bearer_auth(key);
        }

        match request.send().await {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), "push gateway rejected notification");
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to reach push gateway");
            }
        }
    }
}

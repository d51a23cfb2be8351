use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::payload::PushNotification;

/// Failures surfaced by a notification transport.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("serialization failed: {0}")]
    Serialization(String),
    #[error("transport failed: {0}")]
    Transport(String),
    #[error("push rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("push notifications are disabled")]
    Disabled,
}

/// Delivery abstraction; implementations do not retry.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send_notification(&self, notification: &PushNotification) -> Result<(), DispatchError>;
}

/// Topic sends answer with either a message id or an error code.
#[derive(Debug, Deserialize)]
struct FcmResponse {
    #[serde(default)]
    message_id: Option<i64>,
    #[serde(default)]
    error: Option<String>,
}

/// Firebase Cloud Messaging dispatcher (legacy HTTP API).
///
/// Speaks the legacy `/fcm/send` wire format (`Authorization: key=...`, topic in
/// `to`) that existing clients subscribe through. Google has retired this API;
/// point `notification.fcm_endpoint` at a compatible relay when the upstream
/// endpoint is unavailable.
pub struct FcmDispatcher {
    client: reqwest::Client,
    endpoint: String,
    server_key: Option<String>,
}

impl FcmDispatcher {
    /// `server_key = None` builds a dispatcher that refuses every send.
    pub fn new(endpoint: impl Into<String>, server_key: Option<String>, timeout: Duration) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        let server_key = server_key.filter(|k| !k.trim().is_empty());
        Ok(Self { client, endpoint: endpoint.into(), server_key })
    }

    pub fn from_config(cfg: &configs::NotificationConfig) -> Result<Self, DispatchError> {
        Self::new(
            cfg.fcm_endpoint.clone(),
            Some(cfg.fcm_server_key.clone()),
            Duration::from_secs(cfg.timeout_secs),
        )
    }

    pub fn is_enabled(&self) -> bool { self.server_key.is_some() }
}

#[async_trait]
impl NotificationDispatcher for FcmDispatcher {
    #[instrument(skip(self, notification), fields(to = %notification.to))]
    async fn send_notification(&self, notification: &PushNotification) -> Result<(), DispatchError> {
        let Some(key) = self.server_key.as_deref() else {
            warn!("fcm server key not configured; dropping push");
            return Err(DispatchError::Disabled);
        };
        let body = serde_json::to_vec(notification).map_err(|e| DispatchError::Serialization(e.to_string()))?;

        let resp = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("key={key}"))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| DispatchError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(DispatchError::Rejected { status: status.as_u16(), body: text });
        }
        // A 200 can still carry a per-message error
        if let Ok(parsed) = serde_json::from_str::<FcmResponse>(&text) {
            if let Some(error) = parsed.error {
                return Err(DispatchError::Rejected { status: status.as_u16(), body: error });
            }
            debug!(message_id = ?parsed.message_id, "fcm accepted push");
        }
        Ok(())
    }
}

/// Recording dispatcher for tests and local runs without FCM credentials.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingDispatcher {
        sent: Mutex<Vec<PushNotification>>,
        fail_with: Mutex<Option<String>>,
    }

    impl RecordingDispatcher {
        /// Make every following send fail with a transport error.
        pub fn fail_with(&self, reason: &str) {
            *self.fail_with.lock().unwrap() = Some(reason.to_string());
        }

        pub fn sent(&self) -> Vec<PushNotification> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationDispatcher for RecordingDispatcher {
        async fn send_notification(&self, notification: &PushNotification) -> Result<(), DispatchError> {
            if let Some(reason) = self.fail_with.lock().unwrap().clone() {
                return Err(DispatchError::Transport(reason));
            }
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }
}

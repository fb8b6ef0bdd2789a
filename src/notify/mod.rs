//! Notification channel for new doodles.
//!
//! A [`Notifier`] is told about every successfully stored doodle. The shipped
//! implementation sends a templated email through the EmailJS REST API.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::NotifyError;

/// EmailJS send endpoint.
pub const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Sender name shown in notification emails.
pub const DEFAULT_FROM_NAME: &str = "Doodle Notifications!";

/// Body text of notification emails.
pub const DEFAULT_MESSAGE: &str = "New epic doodle woo!";

/// A channel that delivers templated messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Template used for new-doodle messages.
    fn template_id(&self) -> &str;

    /// Send `payload` rendered through `template_id`.
    async fn send(&self, template_id: &str, payload: Value) -> Result<(), NotifyError>;
}

/// Template parameters for a new-doodle message.
pub fn doodle_payload(name: &str, view_link: &str) -> Value {
    json!({
        "from_name": DEFAULT_FROM_NAME,
        "message": DEFAULT_MESSAGE,
        "doodle_name": name,
        "doodle_link": view_link,
    })
}

// =============================================================================
// EmailJS
// =============================================================================

/// EmailJS account settings.
#[derive(Debug, Clone)]
pub struct EmailJsConfig {
    pub service_id: String,
    pub template_id: String,
    /// Public key (sent as `user_id`)
    pub public_key: String,
    /// Private key, required when the account enforces it for API calls
    pub private_key: Option<String>,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: Value,
}

/// Notifier backed by the EmailJS REST API.
pub struct EmailJsNotifier {
    http: reqwest::Client,
    config: EmailJsConfig,
    endpoint: String,
}

impl EmailJsNotifier {
    pub fn new(http: reqwest::Client, config: EmailJsConfig) -> Self {
        Self::with_endpoint(http, config, EMAILJS_SEND_URL)
    }

    pub fn with_endpoint(
        http: reqwest::Client,
        config: EmailJsConfig,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            http,
            config,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Notifier for EmailJsNotifier {
    fn template_id(&self) -> &str {
        &self.config.template_id
    }

    async fn send(&self, template_id: &str, payload: Value) -> Result<(), NotifyError> {
        let request = SendRequest {
            service_id: &self.config.service_id,
            template_id,
            user_id: &self.config.public_key,
            access_token: self.config.private_key.as_deref(),
            template_params: payload,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| NotifyError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(template_id = %template_id, "Notification email sent");
        Ok(())
    }
}

//! Notification API email sender
//!
//! Sends staff emails through notificationapi.com's sender endpoint using
//! basic auth (project id + API key).

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde_json::{json, Value};

use crate::application::ports::{Notifier, NotifierError};
use crate::config::NotificationConfig;

pub struct NotificationApiClient {
    http: reqwest::Client,
    api_base: String,
    project_id: String,
    api_key: String,
}

impl NotificationApiClient {
    pub fn new(config: &NotificationConfig) -> Result<Self, NotifierError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| NotifierError(format!("http client: {}", e)))?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

fn send_payload(recipient: &str, subject: &str, html_body: &str) -> Value {
    json!({
        "type": "send",
        "to": {
            "id": recipient,
            "email": recipient,
        },
        "email": {
            "subject": subject,
            "html": html_body,
        }
    })
}

#[async_trait]
impl Notifier for NotificationApiClient {
    async fn notify(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), NotifierError> {
        let url = format!("{}/{}/sender", self.api_base, self.project_id);
        let response = self
            .http
            .post(url)
            .basic_auth(&self.project_id, Some(&self.api_key))
            .json(&send_payload(recipient, subject, html_body))
            .send()
            .await
            .map_err(|e| NotifierError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifierError(format!(
                "sender endpoint returned {}",
                response.status()
            )));
        }
        debug!("Notification '{}' sent to {}", subject, recipient);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_shape_matches_sender_contract() {
        let payload = send_payload("staff@example.com", "New reservation", "<h2>Hi</h2>");
        assert_eq!(payload["type"], "send");
        assert_eq!(payload["to"]["id"], "staff@example.com");
        assert_eq!(payload["to"]["email"], "staff@example.com");
        assert_eq!(payload["email"]["subject"], "New reservation");
        assert_eq!(payload["email"]["html"], "<h2>Hi</h2>");
    }
}

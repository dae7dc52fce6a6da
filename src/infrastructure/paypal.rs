//! PayPal Orders v2 payment gateway
//!
//! Two-call flow per deposit: create an order with intent `CAPTURE`, then
//! capture it after the payer approves. Authentication is a client-credentials
//! OAuth token fetched per call; order amounts are sent as decimal strings in
//! major units.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::application::ports::{Capture, PaymentGateway};
use crate::config::PaymentConfig;
use crate::domain::PaymentError;

pub struct PayPalGateway {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl PayPalGateway {
    pub fn new(config: &PaymentConfig) -> Result<Self, PaymentError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PaymentError::Unknown(format!("http client: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    async fn access_token(&self) -> Result<String, PaymentError> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let response = self
            .http
            .post(format!("{}/v1/oauth2/token", self.base_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(classify_transport_error)?;

        if !response.status().is_success() {
            return Err(PaymentError::Unknown(format!(
                "token request failed with status {}",
                response.status()
            )));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Unknown(format!("token response: {}", e)))?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl PaymentGateway for PayPalGateway {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        description: &str,
    ) -> Result<String, PaymentError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(format!("{}/v2/checkout/orders", self.base_url))
            .bearer_auth(token)
            .json(&order_payload(amount_minor, currency, description))
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| PaymentError::Unknown(format!("order response: {}", e)))?;
        if !status.is_success() {
            warn!("PayPal order creation failed ({}): {}", status, body);
            return Err(classify_failure_body(&body, status.as_u16()));
        }

        body.get("id")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| PaymentError::Unknown("order response missing id".to_string()))
    }

    async fn capture_order(&self, order_id: &str) -> Result<Capture, PaymentError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(format!(
                "{}/v2/checkout/orders/{}/capture",
                self.base_url, order_id
            ))
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| PaymentError::Unknown(format!("capture response: {}", e)))?;
        if !status.is_success() {
            warn!("PayPal capture of {} failed ({}): {}", order_id, status, body);
            return Err(classify_failure_body(&body, status.as_u16()));
        }
        debug!("PayPal capture of {} succeeded", order_id);
        Ok(parse_capture(&body))
    }
}

fn order_payload(amount_minor: i64, currency: &str, description: &str) -> Value {
    json!({
        "intent": "CAPTURE",
        "purchase_units": [{
            "description": description,
            "amount": {
                "currency_code": currency,
                "value": format!("{}.{:02}", amount_minor / 100, (amount_minor % 100).abs()),
            }
        }]
    })
}

/// Map a PayPal error body to a payment error. Declines and pending payer
/// approval come back as `details[].issue` codes.
fn classify_failure_body(body: &Value, status: u16) -> PaymentError {
    let issue = body
        .get("details")
        .and_then(Value::as_array)
        .and_then(|details| details.first())
        .and_then(|d| d.get("issue"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    match issue {
        "INSTRUMENT_DECLINED" => PaymentError::Declined,
        "PAYER_ACTION_REQUIRED" | "ORDER_NOT_APPROVED" => PaymentError::PayerActionRequired,
        other => {
            let name = body.get("name").and_then(Value::as_str).unwrap_or("error");
            if other.is_empty() {
                PaymentError::Unknown(format!("{} (status {})", name, status))
            } else {
                PaymentError::Unknown(format!("{}: {} (status {})", name, other, status))
            }
        }
    }
}

fn classify_transport_error(e: reqwest::Error) -> PaymentError {
    if e.is_timeout() {
        PaymentError::Timeout
    } else {
        PaymentError::Unknown(e.to_string())
    }
}

fn parse_capture(body: &Value) -> Capture {
    let capture_id = body
        .pointer("/purchase_units/0/payments/captures/0/id")
        .and_then(Value::as_str)
        .or_else(|| body.get("id").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();
    let payer_name = body
        .pointer("/payer/name/given_name")
        .and_then(Value::as_str)
        .map(|given| {
            match body.pointer("/payer/name/surname").and_then(Value::as_str) {
                Some(surname) => format!("{} {}", given, surname),
                None => given.to_string(),
            }
        });
    Capture {
        capture_id,
        payer_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_payload_formats_amount_in_major_units() {
        let payload = order_payload(400, "USD", "Deposit for reservation X");
        assert_eq!(
            payload.pointer("/purchase_units/0/amount/value"),
            Some(&json!("4.00"))
        );
        assert_eq!(
            payload.pointer("/purchase_units/0/amount/currency_code"),
            Some(&json!("USD"))
        );
        assert_eq!(payload["intent"], "CAPTURE");

        let payload = order_payload(105, "USD", "x");
        assert_eq!(
            payload.pointer("/purchase_units/0/amount/value"),
            Some(&json!("1.05"))
        );
    }

    #[test]
    fn instrument_declined_maps_to_declined() {
        let body = json!({
            "name": "UNPROCESSABLE_ENTITY",
            "details": [{ "issue": "INSTRUMENT_DECLINED" }]
        });
        assert_eq!(classify_failure_body(&body, 422), PaymentError::Declined);
    }

    #[test]
    fn payer_action_required_maps_to_retryable_kind() {
        let body = json!({
            "name": "UNPROCESSABLE_ENTITY",
            "details": [{ "issue": "PAYER_ACTION_REQUIRED" }]
        });
        let err = classify_failure_body(&body, 422);
        assert_eq!(err, PaymentError::PayerActionRequired);
        assert!(err.is_retryable());
    }

    #[test]
    fn unrecognized_failure_is_unknown() {
        let body = json!({ "name": "INTERNAL_SERVICE_ERROR" });
        let err = classify_failure_body(&body, 500);
        assert!(matches!(err, PaymentError::Unknown(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn capture_response_parsing() {
        let body = json!({
            "id": "ORDER-1",
            "purchase_units": [{
                "payments": { "captures": [{ "id": "CAP-42" }] }
            }],
            "payer": { "name": { "given_name": "Ana", "surname": "Cruz" } }
        });
        let capture = parse_capture(&body);
        assert_eq!(capture.capture_id, "CAP-42");
        assert_eq!(capture.payer_name.as_deref(), Some("Ana Cruz"));
    }

    #[test]
    fn capture_parsing_falls_back_to_order_id() {
        let body = json!({ "id": "ORDER-1" });
        let capture = parse_capture(&body);
        assert_eq!(capture.capture_id, "ORDER-1");
        assert!(capture.payer_name.is_none());
    }
}

use crate::config::AppConfig;
use crate::domain::model::{Outcome, UserPayload};
use crate::utils::error::{MigrateError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

/// Sends one user-creation request at a time and classifies the raw response
/// into an Outcome. Submission failures never escape as errors; every attempt
/// yields exactly one Outcome.
pub struct SubmissionClient {
    client: Client,
    endpoint: String,
    headers: HeaderMap,
    pacing: Duration,
}

impl SubmissionClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let skey =
            HeaderValue::from_str(&config.secret_key).map_err(|_| MigrateError::ConfigError {
                message: "SKEY contains characters not allowed in an HTTP header".to_string(),
            })?;
        headers.insert("SKEY", skey);

        Ok(Self {
            client: Client::new(),
            endpoint: config.endpoint(),
            headers,
            pacing: Duration::from_millis(config.pacing_ms),
        })
    }

    /// Performs exactly one submission, then sleeps the pacing interval
    /// regardless of outcome to throttle load on the remote service.
    pub async fn create_user(&self, payload: &UserPayload) -> Outcome {
        let outcome = self.send(payload).await;
        tokio::time::sleep(self.pacing).await;
        outcome
    }

    async fn send(&self, payload: &UserPayload) -> Outcome {
        let email = if payload.email.trim().is_empty() {
            "N/A".to_string()
        } else {
            payload.email.clone()
        };

        let response = match self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return Outcome::TransportError {
                    email,
                    detail: e.to_string(),
                }
            }
        };

        let http_status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Outcome::TransportError {
                    email,
                    detail: e.to_string(),
                }
            }
        };

        classify_response(email, http_status, &body)
    }
}

/// Prioritized classification of an HTTP response body; first match wins.
/// The duplicate check outranks the generic non-200 check.
fn classify_response(email: String, http_status: u16, body: &str) -> Outcome {
    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => {
            return Outcome::MalformedResponse {
                email,
                http_status,
                body: body.to_string(),
            }
        }
    };

    let status = parsed
        .get("Status")
        .and_then(serde_json::Value::as_i64)
        .unwrap_or(0);
    let message = parsed
        .get("Message")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("")
        .to_string();

    if status == 508 && message.contains("EMAIL_EXISTS") {
        Outcome::SkippedDuplicate { email, message }
    } else if message.contains("INVALID_PHONE_NUMBER") {
        Outcome::InvalidPhone { email, message }
    } else if status != 200 {
        Outcome::UnexpectedApiError {
            email,
            status,
            message,
        }
    } else {
        Outcome::Created {
            email,
            body: parsed,
        }
    }
}

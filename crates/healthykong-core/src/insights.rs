//! AI weekly-summary client.
//!
//! Sends the aggregated weekly statistics to a chat-completions-style
//! endpoint and returns the free-text insight. The call is opaque to the
//! rest of the system; the engine never depends on this module, and a
//! failed call surfaces as an error the caller presents as "try again".
//!
//! The API key lives in the OS keyring, never in the config file.

use reqwest::Client;
use serde_json::json;

use crate::error::InsightsError;
use crate::report::WeeklyReport;
use crate::store::config::InsightsConfig;

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "healthykong";

    pub fn get(key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

const SYSTEM_PROMPT: &str = "You are a friendly health coach. Given a user's weekly \
self-tracking statistics, write a short, encouraging summary (3-4 sentences) with one \
concrete suggestion. Do not give medical diagnoses.";

/// Client for the insights endpoint.
pub struct InsightsClient {
    endpoint: String,
    model: String,
    api_key: String,
}

impl InsightsClient {
    /// Build a client from config, reading the API key from the keyring.
    ///
    /// # Errors
    /// `MissingApiKey` if no key has been stored.
    pub fn from_config(config: &InsightsConfig) -> Result<Self, InsightsError> {
        let api_key = keyring_store::get("insights_api_key")
            .ok()
            .flatten()
            .ok_or(InsightsError::MissingApiKey)?;
        Ok(Self::new(&config.endpoint, &config.model, &api_key))
    }

    /// Build a client with an explicit key (tests, one-off overrides).
    pub fn new(endpoint: &str, model: &str, api_key: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Persist the API key to the OS keyring.
    pub fn store_api_key(key: &str) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::set("insights_api_key", key)
    }

    /// Generate the weekly insight text for a report.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success HTTP status,
    /// or a response without a completion.
    pub async fn generate(&self, report: &WeeklyReport) -> Result<String, InsightsError> {
        let client = Client::new();
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": report.to_prompt_text() },
            ],
        });

        let resp = client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(InsightsError::HttpStatus {
                status: resp.status().as_u16(),
            });
        }

        let payload: serde_json::Value = resp.json().await?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| {
                InsightsError::MalformedResponse("no message content in response".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::DayBoundary;
    use chrono::NaiveDate;

    fn sample_report() -> WeeklyReport {
        WeeklyReport::for_week(
            &[],
            &DayBoundary::from_offset_hours(0),
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        )
    }

    #[tokio::test]
    async fn returns_completion_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"Nice week! Keep it up."}}]}"#,
            )
            .create_async()
            .await;

        let client = InsightsClient::new(
            &format!("{}/v1/chat/completions", server.url()),
            "test-model",
            "test-key",
        );
        let text = client.generate(&sample_report()).await.unwrap();
        assert_eq!(text, "Nice week! Keep it up.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_surfaces_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .create_async()
            .await;

        let client = InsightsClient::new(
            &format!("{}/v1/chat/completions", server.url()),
            "test-model",
            "test-key",
        );
        let err = client.generate(&sample_report()).await.unwrap_err();
        assert!(matches!(err, InsightsError::HttpStatus { status: 500 }));
    }

    #[tokio::test]
    async fn missing_content_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = InsightsClient::new(
            &format!("{}/v1/chat/completions", server.url()),
            "test-model",
            "test-key",
        );
        let err = client.generate(&sample_report()).await.unwrap_err();
        assert!(matches!(err, InsightsError::MalformedResponse(_)));
    }
}

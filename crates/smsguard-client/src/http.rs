//! HTTP client for a running `smsguard serve` instance.

use serde::Serialize;
use serde::de::DeserializeOwned;
use smsguard_core::{CorpusSummary, MessageStats, PredictionResult, StoredMessage};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client for the prediction and message endpoints.
pub struct SmsGuardClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    label: &'a str,
    message: &'a str,
}

impl SmsGuardClient {
    /// Create a client for the server at `base_url`, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Classify `message` against the named corpus.
    pub async fn predict(
        &self,
        corpus: &str,
        message: &str,
    ) -> Result<PredictionResult, ClientError> {
        let url = format!("{}/api/predictions/{corpus}", self.base_url);
        debug!(url = %url, "requesting prediction");
        let resp = self
            .client
            .post(&url)
            .json(&PredictRequest { message })
            .send()
            .await?;
        let result: PredictionResult = read_json(resp).await?;
        info!(
            corpus,
            prediction = %result.prediction,
            accuracy = result.confidence,
            "prediction received"
        );
        Ok(result)
    }

    /// Store a labelled message on the server.
    pub async fn submit(&self, label: &str, message: &str) -> Result<StoredMessage, ClientError> {
        let url = format!("{}/api/messages", self.base_url);
        info!(url = %url, label, "submitting message");
        let resp = self
            .client
            .post(&url)
            .json(&SubmitRequest { label, message })
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn stats(&self) -> Result<MessageStats, ClientError> {
        let url = format!("{}/api/stats", self.base_url);
        read_json(self.client.get(&url).send().await?).await
    }

    /// Corpora served by the remote instance.
    pub async fn corpora(&self) -> Result<Vec<CorpusSummary>, ClientError> {
        let url = format!("{}/api/corpora", self.base_url);
        let corpora: Vec<CorpusSummary> = read_json(self.client.get(&url).send().await?).await?;
        info!(count = corpora.len(), "listed corpora");
        Ok(corpora)
    }
}

/// Turn non-2xx into [`ClientError::Server`], otherwise decode the body.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(ClientError::Server {
            status: status.as_u16(),
            body: error_message(&body),
        });
    }
    Ok(serde_json::from_str(&body)?)
}

/// The `error` field of a `{"error": ...}` body, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

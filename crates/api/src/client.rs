use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Interval between simulated pull-progress ticks.
const PULL_TICK: Duration = Duration::from_secs(1);

const ANONYMIZE_PROMPT: &str = "Please anonymize the following text by replacing all \
    personal identifiable information (names, addresses, phone numbers, email addresses, \
    etc.) with generic placeholders. Keep the structure, language, and meaning of the \
    text intact. Here's the text to anonymize:";

/// One installed model as reported by `/api/tags`.  Consumed read-only.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified_at: String,
    #[serde(default)]
    pub digest: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

/// The operations the wizard drives against the model runtime.  Implemented
/// by [`OllamaApi`]; step controllers take it as a trait object so tests can
/// script outcomes.
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// Lightweight reachability check.  `true` only on an HTTP 200 from the
    /// listing endpoint; any transport failure is `false`, never an error.
    async fn probe(&self) -> bool;

    /// Names of installed models.  Empty on any failure (logged, not surfaced).
    async fn list_models(&self) -> Vec<String>;

    /// Download a model into the runtime's local store.
    ///
    /// Progress on `progress` is simulated: a 1 Hz ticker emits
    /// `10, 20, .. 100` regardless of how far the real transfer is.  The
    /// returned `Result` reflects the actual pull request and is authoritative
    /// over the progress stream: the gauge can hit 100 before the request
    /// settles, or the request can fail after it already has.
    async fn pull_model(
        &self,
        name: &str,
        progress: mpsc::UnboundedSender<u8>,
    ) -> Result<(), ApiError>;

    /// Single non-streaming generate call that rewrites PII spans in `text`
    /// into generic placeholders.
    async fn anonymize(&self, text: &str, model: &str) -> Result<String, ApiError>;
}

#[derive(Debug, Clone)]
pub struct OllamaApi {
    base_url: String,
    http: reqwest::Client,
}

impl Default for OllamaApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl OllamaApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Full descriptors from `/api/tags`, for status reporting.  Same
    /// absorbing failure contract as [`RuntimeClient::list_models`].
    pub async fn installed_models(&self) -> Vec<ModelEntry> {
        let response = match self.http.get(self.endpoint("/api/tags")).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(status = %response.status(), "model listing rejected");
                return Vec::new();
            }
            Err(error) => {
                debug!(%error, "model listing failed");
                return Vec::new();
            }
        };

        match response.json::<TagsResponse>().await {
            Ok(tags) => tags.models,
            Err(error) => {
                debug!(%error, "model listing returned a malformed payload");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl RuntimeClient for OllamaApi {
    async fn probe(&self) -> bool {
        match self.http.get(self.endpoint("/api/tags")).send().await {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                debug!(%error, "ollama probe failed");
                false
            }
        }
    }

    async fn list_models(&self) -> Vec<String> {
        self.installed_models()
            .await
            .into_iter()
            .map(|model| model.name)
            .collect()
    }

    async fn pull_model(
        &self,
        name: &str,
        progress: mpsc::UnboundedSender<u8>,
    ) -> Result<(), ApiError> {
        // The pull itself is a single non-streaming request; the ticker below
        // synthesizes progress at a fixed rate and is not synchronized with it.
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(PULL_TICK);
            ticker.tick().await; // the first tick completes immediately
            for percent in (10..=100u8).step_by(10) {
                ticker.tick().await;
                if progress.send(percent).is_err() {
                    break;
                }
            }
        });

        let response = self
            .http
            .post(self.endpoint("/api/pull"))
            .json(&json!({ "name": name }))
            .send()
            .await
            .map_err(|error| {
                warn!(%error, model = name, "model pull failed");
                ApiError::classify(&error)
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            warn!(status = %response.status(), model = name, "model pull rejected");
            Err(ApiError::Generic)
        }
    }

    async fn anonymize(&self, text: &str, model: &str) -> Result<String, ApiError> {
        let payload = json!({
            "model": model,
            "prompt": format!("{ANONYMIZE_PROMPT}\n\n{text}"),
            "stream": false,
        });

        let response = self
            .http
            .post(self.endpoint("/api/generate"))
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                warn!(%error, model, "generate request failed");
                ApiError::classify(&error)
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), model, "generate request rejected");
            return Err(ApiError::Generic);
        }

        let body: serde_json::Value = response.json().await.map_err(|error| {
            warn!(%error, "generate response was not valid JSON");
            ApiError::Generic
        })?;

        match body.get("response").and_then(|value| value.as_str()) {
            Some(content) => Ok(content.to_string()),
            None => {
                warn!("generate response is missing the text field");
                Err(ApiError::Generic)
            }
        }
    }
}

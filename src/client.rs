//! Ollama API client struct and builder.

use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, map_http_status, map_reqwest_error};
use crate::generate::{ChatTurn, build_prompt, request_images};
use crate::pull::PullProgress;
use crate::types::{CatalogModel, GenerateRequest, InstalledModel, ModelNameRequest, TagsResponse};
use crate::{generate, pull};

/// Default model used when none is configured.
const DEFAULT_MODEL: &str = "llama3.2:latest";

/// Default Ollama API base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default catalog of downloadable model variants.
const DEFAULT_CATALOG_URL: &str =
    "https://ollamagui-bucket-4458eff47-3712-88ae-de1d.s3.us-east-1.amazonaws.com/models.json";

/// Client for a local Ollama server.
///
/// # Example
///
/// ```no_run
/// use ollama_client::Ollama;
///
/// let client = Ollama::new()
///     .model("llama3.2:latest")
///     .base_url("http://localhost:11434");
/// ```
pub struct Ollama {
    /// Model identifier used for generation requests.
    pub(crate) model: String,
    /// API base URL (override for testing or remote Ollama instances).
    pub(crate) base_url: String,
    /// URL of the static downloadable-model catalog.
    pub(crate) catalog_url: String,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl Ollama {
    /// Create a new client with sensible defaults.
    ///
    /// Default model: `llama3.2:latest`.
    /// Default base URL: `http://localhost:11434`.
    /// No authentication required (Ollama is local).
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            catalog_url: DEFAULT_CATALOG_URL.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client honoring the `OLLAMA_HOST` environment variable for
    /// the base URL, falling back to the default local endpoint.
    #[must_use]
    pub fn from_env() -> Self {
        let client = Self::new();
        match std::env::var("OLLAMA_HOST") {
            Ok(host) if !host.is_empty() => client.base_url(host),
            _ => client,
        }
    }

    /// Override the model used for generation.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing with a local mock server or a remote Ollama
    /// instance.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the downloadable-model catalog URL.
    #[must_use]
    pub fn catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = url.into();
        self
    }

    /// Build the generate endpoint URL.
    pub(crate) fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    /// Build the pull endpoint URL.
    pub(crate) fn pull_url(&self) -> String {
        format!("{}/api/pull", self.base_url)
    }

    /// Build the tags (installed models) endpoint URL.
    pub(crate) fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url)
    }

    /// Build the delete endpoint URL.
    pub(crate) fn delete_url(&self) -> String {
        format!("{}/api/delete", self.base_url)
    }

    /// Stream a response to the given conversation, delivering each text
    /// increment to `on_token` in arrival order.
    ///
    /// Returns the fully accumulated response text on normal end-of-stream.
    /// Signaling `cancel` aborts the read loop within one iteration,
    /// releases the connection, and returns [`ClientError::Cancelled`] —
    /// distinct from failure, so the caller can annotate the partial output
    /// instead of reporting an error.
    pub async fn generate(
        &self,
        turns: &[ChatTurn],
        mut on_token: impl FnMut(&str),
        cancel: &CancellationToken,
    ) -> Result<String, ClientError> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let body = GenerateRequest {
            model: &self.model,
            prompt: build_prompt(turns),
            stream: true,
            images: request_images(turns),
        };

        let url = self.generate_url();
        tracing::debug!(url = %url, model = %self.model, "sending streaming generate request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.map_err(map_reqwest_error)?;
            return Err(map_http_status(status, &body_text));
        }

        generate::consume(response, &mut on_token, cancel).await
    }

    /// Download and install the named model, delivering each aggregated
    /// progress report to `on_progress` in arrival order.
    ///
    /// Resolves when the server closes the stream. There is no cancellation
    /// token for pulls; dropping the returned future aborts the transfer.
    pub async fn pull(
        &self,
        name: &str,
        mut on_progress: impl FnMut(PullProgress),
    ) -> Result<(), ClientError> {
        let url = self.pull_url();
        tracing::debug!(url = %url, model = %name, "starting model pull");

        let response = self
            .client
            .post(&url)
            .json(&ModelNameRequest { name })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.map_err(map_reqwest_error)?;
            return Err(map_http_status(status, &body_text));
        }

        pull::consume(response, &mut on_progress).await
    }

    /// List the models currently installed on the server.
    ///
    /// Fetch failure surfaces as an error; falling back to a default model
    /// list is caller policy.
    pub async fn installed_models(&self) -> Result<Vec<InstalledModel>, ClientError> {
        let response = self
            .client
            .get(self.tags_url())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.map_err(map_reqwest_error)?;
            return Err(map_http_status(status, &body_text));
        }

        let tags: TagsResponse = response.json().await.map_err(|e| {
            ClientError::InvalidRequest(format!("invalid JSON response from /api/tags: {e}"))
        })?;
        Ok(tags.models)
    }

    /// Delete the named model from the server.
    ///
    /// Deleting a model that does not exist surfaces as
    /// [`ClientError::ModelNotFound`], never silent success.
    pub async fn delete_model(&self, name: &str) -> Result<(), ClientError> {
        let url = self.delete_url();
        tracing::debug!(url = %url, model = %name, "deleting model");

        let response = self
            .client
            .delete(&url)
            .json(&ModelNameRequest { name })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.map_err(map_reqwest_error)?;
            return Err(map_http_status(status, &body_text));
        }
        Ok(())
    }

    /// Fetch the static catalog of downloadable model variants.
    pub async fn available_models(&self) -> Result<Vec<CatalogModel>, ClientError> {
        let response = self
            .client
            .get(&self.catalog_url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.map_err(map_reqwest_error)?;
            return Err(map_http_status(status, &body_text));
        }

        response.json().await.map_err(|e| {
            ClientError::InvalidRequest(format!("invalid JSON response from catalog: {e}"))
        })
    }
}

impl Default for Ollama {
    fn default() -> Self {
        Self::new()
    }
}

//! Ollama API request/response wire types.
//!
//! Only the fields this client reads are modeled; Ollama responses carry
//! additional timing fields that deserialization ignores.

use serde::{Deserialize, Serialize};

/// `POST /api/generate` request body.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    /// Model identifier (e.g. "llama3.2:latest").
    pub model: &'a str,
    /// The fully rendered conversation prompt.
    pub prompt: String,
    /// Always `true`: the response is consumed as an NDJSON stream.
    pub stream: bool,
    /// Base64-encoded images attached to the request, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// One line of the `/api/generate` NDJSON stream.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateChunk {
    /// Incremental response text carried by this line.
    #[serde(default)]
    pub response: String,
    /// Whether generation is complete.
    #[serde(default)]
    pub done: bool,
}

/// `POST /api/pull` and `DELETE /api/delete` request body.
#[derive(Debug, Serialize)]
pub(crate) struct ModelNameRequest<'a> {
    /// Name of the model to pull or delete.
    pub name: &'a str,
}

/// One line of the `/api/pull` NDJSON stream.
///
/// `digest`, `total`, and `completed` are present only on layer-download
/// (`"pulling ..."`) events.
#[derive(Debug, Deserialize)]
pub(crate) struct PullEvent {
    /// Server-reported phase, e.g. "pulling abc123", "writing manifest".
    #[serde(default)]
    pub status: String,
    /// Content digest identifying the layer being downloaded.
    pub digest: Option<String>,
    /// Declared total size of the layer in bytes.
    pub total: Option<u64>,
    /// Bytes of the layer downloaded so far.
    pub completed: Option<u64>,
}

/// `GET /api/tags` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct TagsResponse {
    /// Models currently installed on the server.
    pub models: Vec<InstalledModel>,
}

/// One installed model as reported by `GET /api/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledModel {
    /// Model name including tag (e.g. "llama3.2:latest").
    pub name: String,
}

/// One downloadable model variant from the static catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogModel {
    /// Base model name (e.g. "llama3.2").
    pub model: String,
    /// Available tags for the model (e.g. "latest", "1b", "3b").
    #[serde(default)]
    pub tags: Vec<String>,
}

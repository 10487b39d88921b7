#![deny(missing_docs)]
//! Streaming client for a local [Ollama](https://github.com/ollama/ollama) server.
//!
//! This crate implements the transport core of a local-LLM chat frontend:
//! token-by-token response streaming with cancellation, model downloads with
//! aggregated progress reporting, and installed-model management. Ollama
//! streams NDJSON (newline-delimited JSON), not SSE, so all streaming
//! endpoints share one line-buffering decoder.
//!
//! # Usage
//!
//! ```no_run
//! use ollama_client::{ChatTurn, Ollama, TurnRole};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), ollama_client::ClientError> {
//! let client = Ollama::new().model("llama3.2:latest");
//! let turns = vec![ChatTurn::text(TurnRole::User, "Why is the sky blue?")];
//!
//! let cancel = CancellationToken::new();
//! let reply = client
//!     .generate(&turns, |token| print!("{token}"), &cancel)
//!     .await?;
//! # let _ = reply;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - Streaming `/api/generate` consumption with a per-token sink and a
//!   distinguishable cancelled outcome ([`ClientError::Cancelled`])
//! - `/api/pull` progress aggregation across concurrent layer downloads,
//!   reported as an overall percentage plus an installing phase
//! - Lenient NDJSON decoding: malformed lines are skipped, not fatal
//! - Installed-model listing, deletion, and a static downloadable-model
//!   catalog fetch

pub mod client;
pub mod error;
pub mod generate;
mod ndjson;
pub mod pull;
mod types;

pub use client::Ollama;
pub use error::ClientError;
pub use generate::{ChatTurn, TurnRole};
pub use pull::PullProgress;
pub use types::{CatalogModel, InstalledModel};

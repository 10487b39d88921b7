//! Prompt construction and streaming consumption for `/api/generate`.
//!
//! The conversation is flattened into a single prompt string: a fixed
//! formatting instruction followed by each turn rendered as
//! `"Human: ..."` or `"Assistant: ..."`, joined by blank lines. The
//! streaming response is consumed line by line, forwarding every non-empty
//! text increment to the caller's sink in arrival order.

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;
use crate::ndjson::json_lines;
use crate::types::GenerateChunk;

/// Instruction prepended to every prompt so responses render well in the
/// chat view.
pub const FORMATTING_INSTRUCTION: &str = "Format your response using HTML for better readability. Use <h1>, <h2>, <h3> for titles and subtitles. If you include code, wrap it in <pre><code class=\"language-{language}\"> tags. Use <p> for paragraphs and <ul>/<li> for lists.";

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    /// The human side of the conversation, rendered as "Human".
    User,
    /// The model side of the conversation, rendered as "Assistant".
    Assistant,
}

impl TurnRole {
    fn prompt_label(self) -> &'static str {
        match self {
            Self::User => "Human",
            Self::Assistant => "Assistant",
        }
    }
}

/// One prior turn of the conversation being continued.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// Who produced this turn.
    pub role: TurnRole,
    /// Text content of the turn.
    pub content: String,
    /// Optional base64-encoded image. Only meaningful on the most recent
    /// user turn; images on earlier turns are ignored.
    pub image: Option<String>,
}

impl ChatTurn {
    /// A text-only turn.
    pub fn text(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            image: None,
        }
    }
}

/// Render the conversation into the single prompt string sent to the server.
pub(crate) fn build_prompt(turns: &[ChatTurn]) -> String {
    let mut segments = Vec::with_capacity(turns.len() + 1);
    segments.push(FORMATTING_INSTRUCTION.to_string());
    for turn in turns {
        segments.push(format!("{}: {}", turn.role.prompt_label(), turn.content));
    }
    segments.join("\n\n")
}

/// Image payload for the request body: the final turn's image, if it is a
/// user turn carrying one.
pub(crate) fn request_images(turns: &[ChatTurn]) -> Option<Vec<String>> {
    match turns.last() {
        Some(turn) if turn.role == TurnRole::User => {
            turn.image.clone().map(|image| vec![image])
        }
        _ => None,
    }
}

/// Consume a streaming `/api/generate` response.
///
/// Each decoded line's `response` field is delivered to `on_token` and
/// appended to the accumulated text. The cancellation token is raced against
/// every read and checked before every delivery; on cancellation the
/// response body is dropped (releasing the connection) and
/// [`ClientError::Cancelled`] is returned so the caller can distinguish it
/// from failure.
pub(crate) async fn consume(
    response: reqwest::Response,
    on_token: &mut dyn FnMut(&str),
    cancel: &CancellationToken,
) -> Result<String, ClientError> {
    let mut text = String::new();
    let mut lines = std::pin::pin!(json_lines(response.bytes_stream()));

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!("generation cancelled mid-stream");
                return Err(ClientError::Cancelled);
            }
            item = lines.next() => item,
        };
        let Some(item) = next else { break };

        let chunk: GenerateChunk = match serde_json::from_value(item?) {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::debug!(error = %e, "skipping generate line with unexpected shape");
                continue;
            }
        };

        if !chunk.response.is_empty() {
            on_token(&chunk.response);
            text.push_str(&chunk.response);
        }
        if chunk.done {
            break;
        }
    }

    Ok(text)
}

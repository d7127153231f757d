//! Chat widget state: open flag, message log and the pending send.

use crate::analysis::PredictionResult;
use crate::error::RequestError;
use crate::{ChatRequest, ChatResponse};

/// Shown in place of a reply whenever the chat service cannot answer.
pub const APOLOGY: &str = "Sorry, I'm having trouble connecting right now. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    pub position: usize,
}

/// A piece of message text ready for display. Fragments only ever carry
/// plain text; emphasis and line breaks are structural, never parsed markup.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Text(String),
    Strong(String),
    LineBreak,
}

#[derive(Debug, Default)]
pub struct ChatController {
    open: bool,
    messages: Vec<ChatMessage>,
    pending: bool,
    draft: String,
}

impl ChatController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// True while a send is outstanding; the input is disabled and the
    /// typing indicator shown.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Text typed into the input but not yet sent. It outlives the window
    /// being closed, so the input always shows what Send would submit.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Sends the current draft, clearing it when a request is produced.
    pub fn send_draft(&mut self) -> Option<ChatRequest> {
        let draft = std::mem::take(&mut self.draft);
        let request = self.begin_send(&draft);
        if request.is_none() {
            self.draft = draft;
        }
        request
    }

    /// Flips the window and returns whether it is now open.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Appends the user's message and returns the request to send, or
    /// `None` when the input is blank or another send is still pending.
    pub fn begin_send(&mut self, input: &str) -> Option<ChatRequest> {
        let text = input.trim();
        if text.is_empty() || self.pending {
            return None;
        }
        self.push(Sender::User, text.to_string());
        self.pending = true;
        Some(ChatRequest {
            message: text.to_string(),
        })
    }

    /// Records the reply to the pending send, or the apology on failure.
    /// Returns `None` and changes nothing when no send is outstanding.
    pub fn finish_send(&mut self, outcome: Result<String, RequestError>) -> Option<&ChatMessage> {
        if !self.pending {
            log::warn!("dropping chat reply with no send outstanding");
            return None;
        }
        self.pending = false;
        let text = match outcome {
            Ok(text) => text,
            Err(e) => {
                log::warn!("chat request failed: {}", e);
                APOLOGY.to_string()
            }
        };
        Some(self.push(Sender::Assistant, text))
    }

    /// Opens the window with a greeting about `result`. Does nothing if the
    /// window is already open.
    pub fn offer_greeting(&mut self, result: &PredictionResult) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        self.push(Sender::Assistant, greeting_for(result));
        true
    }

    fn push(&mut self, sender: Sender, text: String) -> &ChatMessage {
        let position = self.messages.len();
        self.messages.push(ChatMessage { text, sender, position });
        &self.messages[position]
    }
}

pub fn greeting_for(result: &PredictionResult) -> String {
    format!(
        "I see the analysis detected **{}** with {}% confidence. \
         Would you like to know more about this result? \
         Remember, this is for educational purposes only.",
        result.label(),
        result.confidence_text()
    )
}

/// Turns an HTTP status and body from `/chat` into reply text.
///
/// A `response` field is shown even next to an `error`, since the server
/// puts its user-facing explanation there. An `error` alone is a failure.
pub fn interpret_reply(status: u16, body: &str) -> Result<String, RequestError> {
    let reply: ChatResponse = serde_json::from_str(body)
        .map_err(|e| RequestError::Transport(format!("HTTP {}: {}", status, e)))?;

    match (reply.response, reply.error) {
        (Some(text), _) if !text.trim().is_empty() => Ok(text),
        (_, Some(error)) => Err(RequestError::Service(error)),
        _ => Err(RequestError::Malformed("missing response".into())),
    }
}

/// Splits message text into lines and `**bold**` runs. An unbalanced `**`
/// leaves the line as plain text.
pub fn format_message(text: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            fragments.push(Fragment::LineBreak);
        }

        let parts: Vec<&str> = line.split("**").collect();
        if parts.len() % 2 == 0 {
            if !line.is_empty() {
                fragments.push(Fragment::Text(line.to_string()));
            }
            continue;
        }

        for (j, part) in parts.into_iter().enumerate() {
            if part.is_empty() {
                continue;
            }
            if j % 2 == 1 {
                fragments.push(Fragment::Strong(part.to_string()));
            } else {
                fragments.push(Fragment::Text(part.to_string()));
            }
        }
    }

    fragments
}

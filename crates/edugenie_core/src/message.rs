//! Chat messages and transcript rendering.

use crate::Role;
use serde::{Deserialize, Serialize};

/// A single turn in an explainer conversation.
///
/// # Examples
///
/// ```
/// use edugenie_core::{ChatMessage, Role};
///
/// let mut reply = ChatMessage::assistant("");
/// reply.append("Photo");
/// reply.append("synthesis");
///
/// assert_eq!(*reply.role(), Role::Assistant);
/// assert_eq!(reply.content(), "Photosynthesis");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ChatMessage {
    /// The role of the message sender
    role: Role,
    /// Message text
    content: String,
}

impl ChatMessage {
    /// Creates a new message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Appends a streamed fragment to the message body.
    pub fn append(&mut self, fragment: &str) {
        self.content.push_str(fragment);
    }

    /// Renders the message as `"<Role>: <content>"`.
    pub fn render(&self) -> String {
        format!("{}: {}", self.role.label(), self.content)
    }
}

/// Flattens prior turns into a prompt transcript.
///
/// Turns are rendered as `"<Role>: <content>"` and joined by blank lines.
///
/// ```
/// use edugenie_core::{ChatMessage, render_transcript};
///
/// let history = vec![ChatMessage::user("Hi"), ChatMessage::assistant("Hello!")];
/// assert_eq!(render_transcript(&history), "User: Hi\n\nAssistant: Hello!");
/// ```
pub fn render_transcript(history: &[ChatMessage]) -> String {
    history
        .iter()
        .map(ChatMessage::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

//! Client-side view of a streamed assistant message
//!
//! Applies wire parts the way the chat page does: text is appended, a
//! finish line completes the message, the annotation is kept for the
//! details panel, and an error line fails the message.

use crate::chat::frames::{AnnotatedUsage, FrameParseError, WirePart};
use crate::domain::{ChatMessage, FinishReason};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageState {
    #[default]
    Streaming,
    Complete,
    Failed,
}

/// Assistant message assembled from a data stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantMessage {
    content: String,
    state: MessageState,
    finish_reason: Option<FinishReason>,
    annotation: Option<AnnotatedUsage>,
    error: Option<String>,
}

impl AssistantMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a message from a complete response body
    pub fn from_wire(body: &str) -> Result<Self, FrameParseError> {
        let mut message = Self::new();
        for line in body.lines().filter(|line| !line.trim().is_empty()) {
            message.apply(WirePart::parse(line)?);
        }
        Ok(message)
    }

    pub fn apply(&mut self, part: WirePart) {
        if self.state == MessageState::Failed {
            return;
        }

        match part {
            WirePart::Text(text) => self.content.push_str(&text),
            WirePart::FinishStep(step) => self.finish_reason = Some(step.finish_reason),
            WirePart::FinishMessage(message) => {
                self.finish_reason = Some(message.finish_reason);
                self.state = MessageState::Complete;
            }
            WirePart::MessageAnnotations(annotations) => {
                if let Some(first) = annotations.into_iter().next() {
                    self.annotation = Some(first.usage);
                }
            }
            WirePart::Error(message) => {
                self.error = Some(message);
                self.state = MessageState::Failed;
            }
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn state(&self) -> MessageState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == MessageState::Complete
    }

    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finish_reason
    }

    pub fn annotation(&self) -> Option<&AnnotatedUsage> {
        self.annotation.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Assistant turn to append to the conversation history
    ///
    /// `None` for a failed or empty reply; the caller then drops the
    /// unanswered user turn so roles keep alternating.
    pub fn reply_turn(&self) -> Option<ChatMessage> {
        if self.state == MessageState::Failed {
            return None;
        }
        ChatMessage::assistant(self.content.clone()).ok()
    }

    /// Lines of the "Show Details" panel; empty until an annotation arrives
    pub fn detail_lines(&self) -> Vec<String> {
        let Some(usage) = &self.annotation else {
            return Vec::new();
        };

        vec![
            format!("Prompt Tokens: {}", usage.tokens.prompt_tokens),
            format!("Completion Tokens: {}", usage.tokens.completion_tokens),
            format!("Total Tokens: {}", usage.tokens.total_tokens),
            format!(
                "Time to First Chunk: {:.2}ms",
                usage.timing.ms_to_first_chunk
            ),
            format!("Time to Finish: {:.2}ms", usage.timing.ms_to_finish),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = concat!(
        "0:\"Hel\"\n",
        "0:\"lo\"\n",
        "e:{\"finishReason\":\"stop\",\"usage\":{\"promptTokens\":5,\"completionTokens\":2},\"isContinued\":false}\n",
        "d:{\"finishReason\":\"stop\",\"usage\":{\"promptTokens\":5,\"completionTokens\":2}}\n",
        "8:[{\"usage\":{\"promptTokens\":5,\"completionTokens\":2,\"totalTokens\":7,\"msToFirstChunk\":12.346,\"msToFinish\":40}}]\n",
    );

    #[test]
    fn test_complete_stream_assembles_message() {
        let message = AssistantMessage::from_wire(BODY).unwrap();

        assert_eq!(message.content(), "Hello");
        assert!(message.is_complete());
        assert_eq!(message.finish_reason(), Some(FinishReason::Stop));
        assert_eq!(message.annotation().unwrap().tokens.total_tokens, 7);
        assert_eq!(message.error(), None);
    }

    #[test]
    fn test_completed_reply_becomes_assistant_turn() {
        let message = AssistantMessage::from_wire(BODY).unwrap();
        assert_eq!(
            message.reply_turn(),
            Some(ChatMessage::assistant("Hello").unwrap())
        );
    }

    #[test]
    fn test_failed_reply_has_no_turn() {
        let message =
            AssistantMessage::from_wire("0:\"Hel\"\n3:\"An error occurred.\"\n").unwrap();
        assert_eq!(message.state(), MessageState::Failed);
        assert_eq!(message.reply_turn(), None);
    }

    #[test]
    fn test_empty_reply_has_no_turn() {
        let message = AssistantMessage::from_wire(concat!(
            "d:{\"finishReason\":\"stop\",\"usage\":{\"promptTokens\":1,\"completionTokens\":0}}\n",
        ))
        .unwrap();
        assert!(message.is_complete());
        assert_eq!(message.reply_turn(), None);
    }

    #[test]
    fn test_detail_lines_use_two_decimals() {
        let message = AssistantMessage::from_wire(BODY).unwrap();
        assert_eq!(
            message.detail_lines(),
            vec![
                "Prompt Tokens: 5",
                "Completion Tokens: 2",
                "Total Tokens: 7",
                "Time to First Chunk: 12.35ms",
                "Time to Finish: 40.00ms",
            ]
        );
    }

    #[test]
    fn test_partial_stream_is_still_streaming() {
        let message = AssistantMessage::from_wire("0:\"Hel\"\n").unwrap();
        assert_eq!(message.state(), MessageState::Streaming);
        assert!(message.detail_lines().is_empty());
    }

    #[test]
    fn test_error_line_fails_message_and_ignores_rest() {
        let message =
            AssistantMessage::from_wire("0:\"Hel\"\n3:\"An error occurred.\"\n0:\"lo\"\n").unwrap();
        assert_eq!(message.state(), MessageState::Failed);
        assert_eq!(message.content(), "Hel");
        assert_eq!(message.error(), Some("An error occurred."));
    }

    #[test]
    fn test_malformed_line_is_rejected() {
        assert!(AssistantMessage::from_wire("0:\"ok\"\ngarbage\n").is_err());
    }
}

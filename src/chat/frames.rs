//! Line-delimited data stream wire format
//!
//! Every line is a single-character part code, a colon, and a JSON payload:
//!
//! | code | part | payload |
//! |---|---|---|
//! | `0` | text delta | JSON string |
//! | `3` | error | JSON string |
//! | `8` | message annotations | JSON array |
//! | `e` | finish step | `{finishReason, usage, isContinued}` |
//! | `d` | finish message | `{finishReason, usage}` |
//!
//! A [`StreamFrame`] is what the adapter produces; a [`WirePart`] is one
//! encoded line. A finish event is written as both an `e` and a `d` line.

use crate::domain::{FinishReason, TimingInfo, TokenUsage};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Normalized unit of a streamed reply
#[derive(Debug, Clone, PartialEq)]
pub enum StreamFrame {
    /// Incremental content fragment
    TextDelta { text: String },
    /// End of generation
    FinishEvent {
        finish_reason: FinishReason,
        usage: TokenUsage,
    },
    /// Usage and timing attached to the completed message
    UsageAnnotation {
        usage: TokenUsage,
        timing: TimingInfo,
    },
    /// Upstream failure; nothing follows it
    Error { message: String },
}

impl StreamFrame {
    pub fn text(text: impl Into<String>) -> Self {
        Self::TextDelta { text: text.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Whether the frame closes the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::UsageAnnotation { .. } | Self::Error { .. })
    }

    /// Wire parts for this frame, in the order they are written
    pub fn wire_parts(&self) -> Vec<WirePart> {
        match self {
            Self::TextDelta { text } => vec![WirePart::Text(text.clone())],
            Self::FinishEvent {
                finish_reason,
                usage,
            } => {
                let usage = FinishUsage::from(*usage);
                vec![
                    WirePart::FinishStep(FinishStep {
                        finish_reason: *finish_reason,
                        usage,
                        is_continued: false,
                    }),
                    WirePart::FinishMessage(FinishMessage {
                        finish_reason: *finish_reason,
                        usage,
                    }),
                ]
            }
            Self::UsageAnnotation { usage, timing } => {
                vec![WirePart::MessageAnnotations(vec![MessageAnnotation {
                    usage: AnnotatedUsage {
                        tokens: *usage,
                        timing: *timing,
                    },
                }])]
            }
            Self::Error { message } => vec![WirePart::Error(message.clone())],
        }
    }

    /// Encode the frame as one or more newline-terminated lines
    pub fn encode(&self) -> Result<Bytes, serde_json::Error> {
        let mut out = String::new();
        for part in self.wire_parts() {
            part.encode_into(&mut out)?;
        }
        Ok(Bytes::from(out))
    }
}

/// One line of the data stream
#[derive(Debug, Clone, PartialEq)]
pub enum WirePart {
    Text(String),
    Error(String),
    MessageAnnotations(Vec<MessageAnnotation>),
    FinishStep(FinishStep),
    FinishMessage(FinishMessage),
}

impl WirePart {
    pub const TEXT: char = '0';
    pub const ERROR: char = '3';
    pub const MESSAGE_ANNOTATIONS: char = '8';
    pub const FINISH_STEP: char = 'e';
    pub const FINISH_MESSAGE: char = 'd';

    pub fn code(&self) -> char {
        match self {
            Self::Text(_) => Self::TEXT,
            Self::Error(_) => Self::ERROR,
            Self::MessageAnnotations(_) => Self::MESSAGE_ANNOTATIONS,
            Self::FinishStep(_) => Self::FINISH_STEP,
            Self::FinishMessage(_) => Self::FINISH_MESSAGE,
        }
    }

    fn payload(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Text(text) | Self::Error(text) => serde_json::to_string(text),
            Self::MessageAnnotations(annotations) => serde_json::to_string(annotations),
            Self::FinishStep(step) => serde_json::to_string(step),
            Self::FinishMessage(message) => serde_json::to_string(message),
        }
    }

    /// Append `code:payload\n` to `out`
    pub fn encode_into(&self, out: &mut String) -> Result<(), serde_json::Error> {
        let payload = self.payload()?;
        out.reserve(payload.len() + 3);
        out.push(self.code());
        out.push(':');
        out.push_str(&payload);
        out.push('\n');
        Ok(())
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        self.encode_into(&mut out)?;
        Ok(out)
    }

    /// Parse a single line, with or without its trailing newline
    pub fn parse(line: &str) -> Result<Self, FrameParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (code, payload) = line
            .split_once(':')
            .ok_or_else(|| FrameParseError::MissingSeparator(line.to_string()))?;

        let mut chars = code.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(FrameParseError::UnknownCode(code.to_string())),
        };

        let part = match code {
            Self::TEXT => Self::Text(serde_json::from_str(payload)?),
            Self::ERROR => Self::Error(serde_json::from_str(payload)?),
            Self::MESSAGE_ANNOTATIONS => Self::MessageAnnotations(serde_json::from_str(payload)?),
            Self::FINISH_STEP => Self::FinishStep(serde_json::from_str(payload)?),
            Self::FINISH_MESSAGE => Self::FinishMessage(serde_json::from_str(payload)?),
            other => return Err(FrameParseError::UnknownCode(other.to_string())),
        };
        Ok(part)
    }
}

/// Token counts carried by the finish lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl From<TokenUsage> for FinishUsage {
    fn from(usage: TokenUsage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        }
    }
}

/// Payload of an `e` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishStep {
    pub finish_reason: FinishReason,
    pub usage: FinishUsage,
    pub is_continued: bool,
}

/// Payload of a `d` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishMessage {
    pub finish_reason: FinishReason,
    pub usage: FinishUsage,
}

/// Entry of an `8` line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MessageAnnotation {
    pub usage: AnnotatedUsage,
}

/// Token counts and timing flattened into one object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedUsage {
    #[serde(flatten)]
    pub tokens: TokenUsage,
    #[serde(flatten)]
    pub timing: TimingInfo,
}

#[derive(Debug, Error)]
pub enum FrameParseError {
    #[error("line has no part separator: {0:?}")]
    MissingSeparator(String),

    #[error("unknown part code {0:?}")]
    UnknownCode(String),

    #[error("invalid part payload: {0}")]
    Payload(#[from] serde_json::Error),
}

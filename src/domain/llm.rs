//! Model names and inference parameters

use nutype::nutype;
use serde::{Deserialize, Serialize};

/// Provider-specific model identifier (e.g. `gpt-4o` or a Bedrock model id)
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 256),
    derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, AsRef, Display)
)]
pub struct ModelName(String);

/// Upper bound on generated tokens
#[nutype(
    validate(greater = 0),
    derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRef, Display)
)]
pub struct MaxTokens(u32);

/// Sampling randomness
#[nutype(
    validate(finite, greater_or_equal = 0.0, less_or_equal = 2.0),
    derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, AsRef, Display)
)]
pub struct Temperature(f32);

/// Nucleus-sampling threshold
#[nutype(
    validate(finite, greater_or_equal = 0.0, less_or_equal = 1.0),
    derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, AsRef, Display)
)]
pub struct TopP(f32);

/// Inference parameters passed through to the provider unchanged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub max_tokens: MaxTokens,
    pub temperature: Temperature,
    pub top_p: TopP,
}

//! Request lifecycle states.
//!
//! One tagged value replaces separate loading/output/error flags, so states
//! like "loading with a stale result" cannot be expressed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SubmitError;

/// Structured body returned by the parsing service on success. Opaque beyond
/// being JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedResult(Value);

impl ParsedResult {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Two-space indented JSON, as shown under "Parsed Data".
    pub fn render_pretty(&self) -> String {
        // Serializing a `Value` cannot fail: keys are always strings.
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }

    pub fn render_compact(&self) -> String {
        self.0.to_string()
    }
}

impl From<Value> for ParsedResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Submitting,
    Succeeded(ParsedResult),
    Failed(String),
}

impl RequestState {
    /// Fold a settled outcome into its terminal state.
    pub fn settled(outcome: Result<ParsedResult, SubmitError>) -> Self {
        match outcome {
            Ok(result) => RequestState::Succeeded(result),
            Err(err) => RequestState::Failed(err.to_string()),
        }
    }

    /// The in-flight indicator.
    pub fn is_submitting(&self) -> bool {
        matches!(self, RequestState::Submitting)
    }

    pub fn result(&self) -> Option<&ParsedResult> {
        match self {
            RequestState::Succeeded(r) => Some(r),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Submitting => "submitting",
            RequestState::Succeeded(_) => "succeeded",
            RequestState::Failed(_) => "failed",
        }
    }
}

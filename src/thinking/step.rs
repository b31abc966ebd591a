//! A single recorded thinking step.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One step of a structured thinking process.
///
/// Immutable once appended to a [`StepLog`](super::StepLog).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinkingStep {
    pub thought: String,
    /// Caller-supplied; not checked for ordering or uniqueness.
    pub step_number: u32,
    /// Caller's expected step count, informational only.
    pub total_steps: u32,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ThinkingStep {
    pub fn new(
        thought: impl Into<String>,
        step_number: u32,
        total_steps: u32,
        metadata: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            thought: thought.into(),
            step_number,
            total_steps,
            timestamp: Utc::now(),
            metadata,
        }
    }
}

/// Renders a metadata value without JSON quoting for plain strings.
pub(crate) struct MetadataValue<'a>(pub &'a serde_json::Value);

impl fmt::Display for MetadataValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            serde_json::Value::String(text) => f.write_str(text),
            other => write!(f, "{other}"),
        }
    }
}

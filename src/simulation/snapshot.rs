//! Named, timestamped brain snapshots for external storage.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::brain::{Brain, BrainError};

/// A saved model: a brain plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSnapshot {
    /// User-facing name.
    pub name: String,
    /// RFC 3339 creation time.
    pub timestamp: String,
    /// Generation the brain was taken from.
    pub generation: u32,
    /// Score the brain achieved.
    pub best_score: f32,
    /// The brain itself, in its persisted form.
    pub brain_data: Brain,
}

impl ModelSnapshot {
    /// Creates a snapshot stamped with the current time.
    pub fn new(name: &str, generation: u32, best_score: f32, brain: Brain) -> Self {
        Self {
            name: name.trim().to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            generation,
            best_score,
            brain_data: brain,
        }
    }

    /// Serializes the snapshot to pretty JSON.
    pub fn to_json(&self) -> Result<String, BrainError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a snapshot, validating the embedded brain.
    pub fn from_json(json: &str) -> Result<Self, BrainError> {
        Ok(serde_json::from_str(json)?)
    }
}

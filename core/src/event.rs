//! Run event log.
//!
//! The engine records one event per pipeline stage so a persisted run
//! can be audited without re-reading the tables.

use crate::types::RunId;
use serde::{Deserialize, Serialize};

/// Variants are only ever appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    RunInitialized {
        seed: u64,
        population: usize,
        days_back: u32,
        top_k: usize,
    },
    ProfilesGenerated {
        count: usize,
    },
    InteractionsGenerated {
        count: usize,
        customers_without_events: usize,
    },
    RecommendationsRanked {
        count: usize,
    },
    AbTestSimulated {
        count: usize,
        conversions: usize,
    },
}

impl PipelineEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunInitialized { .. } => "run_initialized",
            Self::ProfilesGenerated { .. } => "profiles_generated",
            Self::InteractionsGenerated { .. } => "interactions_generated",
            Self::RecommendationsRanked { .. } => "recommendations_ranked",
            Self::AbTestSimulated { .. } => "ab_test_simulated",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    pub seq:        u32,
    pub event_type: String,
    pub payload:    String, // JSON-serialized PipelineEvent
}

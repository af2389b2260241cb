use crate::error::{SimError, SimResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_POPULATION: usize = 1000;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_DAYS_BACK: u32 = 30;
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_RECENT_WINDOW: usize = 50;
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;
/// Upper bound on `days_back` and `lookback_days` (about a century).
pub const MAX_DAYS: u32 = 36_500;

/// 2024-01-01T00:00:00Z, the fixed reference time used by tests.
const TEST_AS_OF_SECS: i64 = 1_704_067_200;

/// Generation parameters for one synthesis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Number of customer profiles to synthesize.
    #[serde(default = "default_population")]
    pub population: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Interaction timestamps fall within this many days before `as_of`.
    #[serde(default = "default_days_back")]
    pub days_back: u32,
    /// Recommendations produced per customer (capped by category count).
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Most recent interactions considered when scoring a customer.
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
    /// Interactions older than this are excluded from the scoring window.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    /// Reference time that every "now minus offset" timestamp is anchored on.
    #[serde(default = "Utc::now")]
    pub as_of: DateTime<Utc>,
}

fn default_population() -> usize {
    DEFAULT_POPULATION
}
fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_days_back() -> u32 {
    DEFAULT_DAYS_BACK
}
fn default_top_k() -> usize {
    DEFAULT_TOP_K
}
fn default_recent_window() -> usize {
    DEFAULT_RECENT_WINDOW
}
fn default_lookback_days() -> u32 {
    DEFAULT_LOOKBACK_DAYS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population: DEFAULT_POPULATION,
            seed: DEFAULT_SEED,
            days_back: DEFAULT_DAYS_BACK,
            top_k: DEFAULT_TOP_K,
            recent_window: DEFAULT_RECENT_WINDOW,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            as_of: Utc::now(),
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Small population at a fixed reference time, for tests.
    pub fn default_test() -> Self {
        Self {
            population: 200,
            seed: 42,
            as_of: DateTime::<Utc>::from_timestamp(TEST_AS_OF_SECS, 0).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject parameters no run can be built from. Called before any draw.
    pub fn validate(&self) -> SimResult<()> {
        let positive: [(&'static str, u64); 5] = [
            ("population", self.population as u64),
            ("days_back", u64::from(self.days_back)),
            ("top_k", self.top_k as u64),
            ("recent_window", self.recent_window as u64),
            ("lookback_days", u64::from(self.lookback_days)),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(SimError::InvalidParameter {
                    name,
                    reason: "must be a positive integer".into(),
                });
            }
        }
        let windows = [("days_back", self.days_back), ("lookback_days", self.lookback_days)];
        for (name, days) in windows {
            if days > MAX_DAYS {
                return Err(SimError::InvalidParameter {
                    name,
                    reason: format!("{days} exceeds the maximum of {MAX_DAYS} days"),
                });
            }
            if self.as_of.checked_sub_signed(Duration::days(i64::from(days))).is_none() {
                return Err(SimError::InvalidParameter {
                    name,
                    reason: format!("{days} days before {} is out of range", self.as_of),
                });
            }
        }
        Ok(())
    }
}

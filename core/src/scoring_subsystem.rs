//! Real-time affinity scoring.
//!
//! Blends a customer's static category preference with their recent
//! behavior:
//!
//!   engagement_boost = (mean engagement in category - 0.5) * 0.3
//!   frequency_boost  = min(0.2, (events in category / 30) * 0.1)
//!   score            = clamp(base + engagement_boost + frequency_boost, 0, 1)
//!
//! The frequency divisor is always 30, whatever the actual window
//! length. Categories without recent events keep their base score.

use crate::{
    interaction_subsystem::InteractionEvent,
    profile_subsystem::CustomerProfile,
    types::ProductCategory,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const FREQUENCY_NORMALIZATION_DAYS: f64 = 30.0;
pub const ENGAGEMENT_PIVOT: f64 = 0.5;
pub const ENGAGEMENT_BOOST_WEIGHT: f64 = 0.3;
pub const FREQUENCY_BOOST_WEIGHT: f64 = 0.1;
pub const FREQUENCY_BOOST_CAP: f64 = 0.2;

/// Affinity per product category, in category declaration order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreVector([f64; 3]);

impl ScoreVector {
    pub fn new(scores: [f64; 3]) -> Self {
        Self(scores)
    }

    pub fn from_fn(f: impl FnMut(ProductCategory) -> f64) -> Self {
        Self(ProductCategory::ALL.map(f))
    }

    pub fn get(&self, category: ProductCategory) -> f64 {
        self.0[category.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProductCategory, f64)> + '_ {
        ProductCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Categories ordered by descending score. The sort is stable, so
    /// equal scores keep category declaration order.
    pub fn ranked(&self) -> Vec<(ProductCategory, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Per-category aggregate of the recent window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CategoryActivity {
    count:            usize,
    engagement_total: f64,
}

pub struct RealTimeScorer;

impl RealTimeScorer {
    /// Score one customer against their pre-filtered recent window.
    /// Events for other customers must already be excluded.
    pub fn score(
        profile: &CustomerProfile,
        recent_interactions: &[&InteractionEvent],
    ) -> ScoreVector {
        let mut activity = [CategoryActivity::default(); 3];
        for event in recent_interactions {
            let slot = &mut activity[event.content_category.index()];
            slot.count += 1;
            slot.engagement_total += event.engagement_score;
        }

        ScoreVector::from_fn(|category| {
            let base = profile.preferences.category(category);
            let seen = activity[category.index()];
            if seen.count == 0 {
                return base;
            }
            let recent_engagement = seen.engagement_total / seen.count as f64;
            let interaction_frequency = seen.count as f64 / FREQUENCY_NORMALIZATION_DAYS;
            Self::adjust(base, recent_engagement, interaction_frequency)
        })
    }

    /// Apply engagement and frequency boosts to a base score.
    pub fn adjust(base: f64, recent_engagement: f64, interaction_frequency: f64) -> f64 {
        let engagement_boost = (recent_engagement - ENGAGEMENT_PIVOT) * ENGAGEMENT_BOOST_WEIGHT;
        let frequency_boost =
            (interaction_frequency * FREQUENCY_BOOST_WEIGHT).min(FREQUENCY_BOOST_CAP);
        (base + engagement_boost + frequency_boost).clamp(0.0, 1.0)
    }
}

/// Select a customer's scoring window: their events within `lookback_days`
/// of `as_of`, newest first, at most `limit` of them. Ties on timestamp
/// keep generation order.
pub fn recent_window<'a>(
    customer_events: &[&'a InteractionEvent],
    as_of: DateTime<Utc>,
    lookback_days: u32,
    limit: usize,
) -> Vec<&'a InteractionEvent> {
    let cutoff = as_of
        .checked_sub_signed(Duration::days(i64::from(lookback_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let mut window: Vec<&InteractionEvent> = customer_events
        .iter()
        .copied()
        .filter(|e| e.timestamp >= cutoff)
        .collect();
    window.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    window.truncate(limit);
    window
}

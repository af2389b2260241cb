//! A/B test outcome simulation.
//!
//! Every recommendation row fans out into one record per variant. Actual
//! engagement is the expected engagement scaled by a variant-specific
//! Gaussian factor; conversion is a Bernoulli draw at 30% of actual
//! engagement.
//!
//! Reads only the recommendation table; knows nothing about how it was
//! produced.

use crate::{
    dataset::RecommendationRow,
    rng::SubsystemRng,
    types::{round_to, CustomerId, RecommendationType, Variant},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MAX_CONVERSION_RATE: f64 = 0.3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AbTestRecord {
    pub test_id:             String,
    pub customer_id:         CustomerId,
    pub variant:             Variant,
    pub recommendation_type: RecommendationType,
    pub expected_engagement: f64,
    pub actual_engagement:   f64,
    pub converted:           bool,
    pub timestamp:           DateTime<Utc>,
}

impl AbTestRecord {
    /// Probability the conversion draw was made against. Never above 0.3.
    pub fn conversion_probability(&self) -> f64 {
        self.actual_engagement * MAX_CONVERSION_RATE
    }
}

pub struct AbTestSimulator;

impl AbTestSimulator {
    /// Exactly `3 * recommendations.len()` records, variants in
    /// control, variant_a, variant_b order per row.
    pub fn simulate(
        recommendations: &[RecommendationRow],
        rng: &mut SubsystemRng,
    ) -> Vec<AbTestRecord> {
        let mut records = Vec::with_capacity(recommendations.len() * Variant::ALL.len());
        for rec in recommendations {
            for variant in Variant::ALL {
                records.push(Self::simulate_one(rec, variant, rng));
            }
        }
        log::info!(
            "ab_test: simulated {} records from {} recommendations",
            records.len(),
            recommendations.len()
        );
        records
    }

    fn simulate_one(
        rec: &RecommendationRow,
        variant: Variant,
        rng: &mut SubsystemRng,
    ) -> AbTestRecord {
        let (mean, sd) = variant.engagement_factor();
        let actual = (rec.expected_engagement * rng.normal(mean, sd)).clamp(0.0, 1.0);
        let converted = rng.chance(actual * MAX_CONVERSION_RATE);

        AbTestRecord {
            test_id: format!("TEST_{}_{}", rec.customer_id, variant),
            customer_id: rec.customer_id.clone(),
            variant,
            recommendation_type: rec.recommendation_type,
            expected_engagement: rec.expected_engagement,
            actual_engagement: round_to(actual, 3),
            converted,
            timestamp: rec.timestamp,
        }
    }
}

/// Outcome totals for one variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantSummary {
    pub variant:                Variant,
    pub records:                usize,
    pub conversions:            usize,
    pub conversion_rate:        f64,
    pub mean_actual_engagement: f64,
}

/// Per-variant totals, in variant order. Variants with no records are
/// reported with zero rates.
pub fn summarize(records: &[AbTestRecord]) -> Vec<VariantSummary> {
    let mut totals: BTreeMap<Variant, (usize, usize, f64)> = Variant::ALL
        .into_iter()
        .map(|v| (v, (0, 0, 0.0)))
        .collect();
    for r in records {
        let entry = totals.entry(r.variant).or_insert((0, 0, 0.0));
        entry.0 += 1;
        entry.1 += usize::from(r.converted);
        entry.2 += r.actual_engagement;
    }
    totals
        .into_iter()
        .map(|(variant, (n, conversions, engagement))| {
            let denom = n.max(1) as f64;
            VariantSummary {
                variant,
                records: n,
                conversions,
                conversion_rate: conversions as f64 / denom,
                mean_actual_engagement: engagement / denom,
            }
        })
        .collect()
}

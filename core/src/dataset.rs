//! Tabular output of a run.
//!
//! Row types here match the exported tables column for column; field
//! order is column order.

use crate::{
    ab_test_subsystem::AbTestRecord,
    interaction_subsystem::InteractionEvent,
    profile_subsystem::CustomerProfile,
    recommendation_subsystem::PersonalizationRecommendation,
    types::{CustomerId, RecommendationType, Segment},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A profile flattened to one column per preference dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileRow {
    pub customer_id:              CustomerId,
    pub age:                      u32,
    pub income:                   f64,
    pub segment:                  Segment,
    pub behavior_score:           f64,
    pub last_interaction:         DateTime<Utc>,
    pub pref_financial_services:  f64,
    pub pref_digital_banking:     f64,
    pub pref_investment_products: f64,
    pub pref_risk_tolerance:      f64,
    pub pref_tech_savviness:      f64,
    pub pref_price_sensitivity:   f64,
    pub pref_brand_loyalty:       f64,
}

impl From<&CustomerProfile> for ProfileRow {
    fn from(p: &CustomerProfile) -> Self {
        let prefs = &p.preferences;
        Self {
            customer_id:              p.customer_id.clone(),
            age:                      p.age,
            income:                   p.income,
            segment:                  p.segment,
            behavior_score:           p.behavior_score,
            last_interaction:         p.last_interaction,
            pref_financial_services:  prefs.financial_services,
            pref_digital_banking:     prefs.digital_banking,
            pref_investment_products: prefs.investment_products,
            pref_risk_tolerance:      prefs.risk_tolerance,
            pref_tech_savviness:      prefs.tech_savviness,
            pref_price_sensitivity:   prefs.price_sensitivity,
            pref_brand_loyalty:       prefs.brand_loyalty,
        }
    }
}

/// A recommendation enriched with the customer's segment and behavior score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationRow {
    pub customer_id:             CustomerId,
    pub recommendation_type:     RecommendationType,
    pub content:                 String,
    pub confidence_score:        f64,
    pub expected_engagement:     f64,
    pub timestamp:               DateTime<Utc>,
    pub customer_segment:        Segment,
    pub customer_behavior_score: f64,
}

impl RecommendationRow {
    pub fn new(rec: PersonalizationRecommendation, profile: &CustomerProfile) -> Self {
        Self {
            customer_id:             rec.customer_id,
            recommendation_type:     rec.recommendation_type,
            content:                 rec.content,
            confidence_score:        rec.confidence_score,
            expected_engagement:     rec.expected_engagement,
            timestamp:               rec.timestamp,
            customer_segment:        profile.segment,
            customer_behavior_score: profile.behavior_score,
        }
    }
}

/// The four tables of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub profiles:        Vec<CustomerProfile>,
    pub interactions:    Vec<InteractionEvent>,
    pub recommendations: Vec<RecommendationRow>,
    pub ab_tests:        Vec<AbTestRecord>,
}

impl Dataset {
    pub fn profile_rows(&self) -> Vec<ProfileRow> {
        self.profiles.iter().map(ProfileRow::from).collect()
    }
}

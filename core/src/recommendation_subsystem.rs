//! Recommendation ranking and typing.
//!
//! Categories are ranked by real-time score; each of the top k becomes a
//! typed recommendation whose type and confidence follow a fixed policy
//! over (score, segment).

use crate::{
    profile_subsystem::CustomerProfile,
    rng::SubsystemRng,
    scoring_subsystem::ScoreVector,
    types::{round_to, CustomerId, ProductCategory, RecommendationType},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const EXPECTED_ENGAGEMENT_CAP: f64 = 0.95;
pub const EXPECTED_ENGAGEMENT_LIFT: f64 = 1.2;

pub const FINANCIAL_PRODUCTS: [&str; 4] =
    ["Credit Card", "Personal Loan", "Investment", "Insurance"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalizationRecommendation {
    pub customer_id:         CustomerId,
    /// The category this recommendation was ranked from.
    pub category:            ProductCategory,
    /// The real-time score the ranking used.
    pub score:               f64,
    pub recommendation_type: RecommendationType,
    pub content:             String,
    pub confidence_score:    f64,
    pub expected_engagement: f64,
    pub timestamp:           DateTime<Utc>,
}

/// First matching rule wins:
///   high-value segment and score > 0.7  -> premium product, 0.9 * score
///   score > 0.6                         -> product,         0.8 * score
///   score > 0.4                         -> educational,     0.7 * score
///   otherwise                           -> promotional,     0.6 * score
pub fn classify(score: f64, profile: &CustomerProfile) -> (RecommendationType, f64) {
    if profile.segment.is_high_value() && score > 0.7 {
        (RecommendationType::PremiumProductRecommendation, score * 0.9)
    } else if score > 0.6 {
        (RecommendationType::ProductRecommendation, score * 0.8)
    } else if score > 0.4 {
        (RecommendationType::EducationalContent, score * 0.7)
    } else {
        (RecommendationType::PromotionalOffer, score * 0.6)
    }
}

pub fn expected_engagement(score: f64, behavior_score: f64) -> f64 {
    (score * behavior_score * EXPECTED_ENGAGEMENT_LIFT).min(EXPECTED_ENGAGEMENT_CAP)
}

pub struct RecommendationRanker {
    as_of: DateTime<Utc>,
}

impl RecommendationRanker {
    pub fn new(as_of: DateTime<Utc>) -> Self {
        Self { as_of }
    }

    /// Exactly min(top_k, 3) recommendations, ordered by descending score
    /// with ties in category declaration order.
    pub fn rank(
        &self,
        profile: &CustomerProfile,
        scores: &ScoreVector,
        top_k: usize,
        rng: &mut SubsystemRng,
    ) -> Vec<PersonalizationRecommendation> {
        scores
            .ranked()
            .into_iter()
            .take(top_k)
            .map(|(category, score)| {
                let (recommendation_type, confidence) = classify(score, profile);
                PersonalizationRecommendation {
                    customer_id: profile.customer_id.clone(),
                    category,
                    score,
                    recommendation_type,
                    content: content_for(category, profile, rng),
                    confidence_score: round_to(confidence, 3),
                    expected_engagement: round_to(
                        expected_engagement(score, profile.behavior_score),
                        3,
                    ),
                    timestamp: self.as_of,
                }
            })
            .collect()
    }
}

/// Only the financial services template draws from the stream.
fn content_for(
    category: ProductCategory,
    profile: &CustomerProfile,
    rng: &mut SubsystemRng,
) -> String {
    match category {
        ProductCategory::FinancialServices => {
            let pick = rng.next_u64_below(FINANCIAL_PRODUCTS.len() as u64) as usize;
            let product = FINANCIAL_PRODUCTS[pick];
            format!("Recommended: {product} tailored for {} customers", profile.segment)
        }
        ProductCategory::DigitalBanking => format!(
            "Enhance your digital banking experience with our latest {category} features"
        ),
        _ => format!("Explore {category} opportunities matching your profile"),
    }
}

//! Customer profile synthesis.
//!
//! Draws a population of customer profiles from parameterised
//! distributions. Profiles are created once and never mutated; every
//! downstream component only reads them.
//!
//! Draw order per customer (fixed, part of the reproducibility contract):
//!   age, income, seven preference dimensions, last-interaction offset.

use crate::{
    error::{SimError, SimResult},
    rng::{RngBank, SubsystemRng, SubsystemSlot},
    types::{CustomerId, ProductCategory, Segment},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const AGE_MEAN: f64 = 45.0;
pub const AGE_SD: f64 = 15.0;
pub const AGE_MIN: u32 = 18;
pub const AGE_MAX: u32 = 80;
pub const INCOME_LOG_MU: f64 = 10.0;
pub const INCOME_LOG_SIGMA: f64 = 0.8;
pub const INCOME_FLOOR: f64 = 1000.0;
pub const LAST_INTERACTION_MAX_DAYS: u64 = 30;

/// Named preference dimensions, in column order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceDimension {
    FinancialServices,
    DigitalBanking,
    InvestmentProducts,
    RiskTolerance,
    TechSavviness,
    PriceSensitivity,
    BrandLoyalty,
}

impl PreferenceDimension {
    pub const ALL: [PreferenceDimension; 7] = [
        Self::FinancialServices,
        Self::DigitalBanking,
        Self::InvestmentProducts,
        Self::RiskTolerance,
        Self::TechSavviness,
        Self::PriceSensitivity,
        Self::BrandLoyalty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinancialServices => "financial_services",
            Self::DigitalBanking => "digital_banking",
            Self::InvestmentProducts => "investment_products",
            Self::RiskTolerance => "risk_tolerance",
            Self::TechSavviness => "tech_savviness",
            Self::PriceSensitivity => "price_sensitivity",
            Self::BrandLoyalty => "brand_loyalty",
        }
    }
}

/// Preference scores in [0, 1]. The three product categories are
/// always present, which is why category lookups cannot fail.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    pub financial_services:  f64,
    pub digital_banking:     f64,
    pub investment_products: f64,
    pub risk_tolerance:      f64,
    pub tech_savviness:      f64,
    pub price_sensitivity:   f64,
    pub brand_loyalty:       f64,
}

impl Preferences {
    pub fn get(&self, dimension: PreferenceDimension) -> f64 {
        match dimension {
            PreferenceDimension::FinancialServices => self.financial_services,
            PreferenceDimension::DigitalBanking => self.digital_banking,
            PreferenceDimension::InvestmentProducts => self.investment_products,
            PreferenceDimension::RiskTolerance => self.risk_tolerance,
            PreferenceDimension::TechSavviness => self.tech_savviness,
            PreferenceDimension::PriceSensitivity => self.price_sensitivity,
            PreferenceDimension::BrandLoyalty => self.brand_loyalty,
        }
    }

    pub fn category(&self, category: ProductCategory) -> f64 {
        match category {
            ProductCategory::FinancialServices => self.financial_services,
            ProductCategory::DigitalBanking => self.digital_banking,
            ProductCategory::InvestmentProducts => self.investment_products,
        }
    }

    /// All dimensions in column order.
    pub fn iter(&self) -> impl Iterator<Item = (PreferenceDimension, f64)> + '_ {
        PreferenceDimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    /// Highest-preference product category; ties go to the first
    /// category in declaration order.
    pub fn top_category(&self) -> ProductCategory {
        let mut best = ProductCategory::ALL[0];
        for category in ProductCategory::ALL.into_iter().skip(1) {
            if self.category(category) > self.category(best) {
                best = category;
            }
        }
        best
    }

    /// Fixed weighted blend of four dimensions, in [0, 1].
    pub fn behavior_score(&self) -> f64 {
        0.3 * self.digital_banking
            + 0.3 * self.financial_services
            + 0.2 * (1.0 - self.price_sensitivity)
            + 0.2 * self.brand_loyalty
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerProfile {
    pub customer_id:      CustomerId,
    pub age:              u32,
    pub income:           f64,
    pub segment:          Segment,
    pub preferences:      Preferences,
    pub behavior_score:   f64,
    pub last_interaction: DateTime<Utc>,
}

impl CustomerProfile {
    /// Assemble a profile, deriving segment and behavior score.
    /// This is the only constructor; the derived fields are never
    /// recomputed afterwards.
    pub fn new(
        customer_id: CustomerId,
        age: u32,
        income: f64,
        preferences: Preferences,
        last_interaction: DateTime<Utc>,
    ) -> Self {
        let age = age.clamp(AGE_MIN, AGE_MAX);
        Self {
            customer_id,
            age,
            income,
            segment: Segment::classify(income, age),
            behavior_score: preferences.behavior_score(),
            preferences,
            last_interaction,
        }
    }
}

pub struct ProfileSynthesizer {
    as_of: DateTime<Utc>,
}

impl ProfileSynthesizer {
    pub fn new(as_of: DateTime<Utc>) -> Self {
        Self { as_of }
    }

    /// Generate `n` profiles from the profile stream of `seed`.
    /// Identical (n, seed, as_of) always yields identical profiles.
    pub fn generate_seeded(&self, n: usize, seed: u64) -> SimResult<Vec<CustomerProfile>> {
        let mut rng = RngBank::new(seed).for_subsystem(SubsystemSlot::Profile);
        self.generate(n, &mut rng)
    }

    pub fn generate(&self, n: usize, rng: &mut SubsystemRng) -> SimResult<Vec<CustomerProfile>> {
        if n == 0 {
            return Err(SimError::InvalidParameter {
                name: "population",
                reason: "must be a positive integer".into(),
            });
        }

        let mut profiles = Vec::with_capacity(n);
        for i in 0..n {
            profiles.push(self.generate_one(i, rng));
        }

        log::info!(
            "profile: synthesized {} customers ({})",
            profiles.len(),
            segment_breakdown(&profiles)
        );
        Ok(profiles)
    }

    fn generate_one(&self, index: usize, rng: &mut SubsystemRng) -> CustomerProfile {
        let age = rng
            .normal(AGE_MEAN, AGE_SD)
            .clamp(f64::from(AGE_MIN), f64::from(AGE_MAX)) as u32;
        let income = rng.log_normal(INCOME_LOG_MU, INCOME_LOG_SIGMA).max(INCOME_FLOOR);

        let preferences = Self::draw_preferences(age, income, rng);

        let days_ago = rng.next_u64_below(LAST_INTERACTION_MAX_DAYS) as i64;
        let last_interaction = self.as_of - Duration::days(days_ago);

        CustomerProfile::new(
            format!("CUST_{:06}", index + 1),
            age,
            income,
            preferences,
            last_interaction,
        )
    }

    /// Digital and tech affinity skew high for younger customers,
    /// investment affinity for higher incomes.
    fn draw_preferences(age: u32, income: f64, rng: &mut SubsystemRng) -> Preferences {
        Preferences {
            financial_services: rng.beta(2.0, 2.0),
            digital_banking: if age < 50 { rng.beta(3.0, 2.0) } else { rng.beta(1.0, 3.0) },
            investment_products: if income > 30_000.0 {
                rng.beta(2.0, 3.0)
            } else {
                rng.beta(1.0, 4.0)
            },
            risk_tolerance: rng.beta(2.0, 2.0),
            tech_savviness: if age < 40 { rng.beta(3.0, 2.0) } else { rng.beta(1.0, 3.0) },
            price_sensitivity: rng.beta(2.0, 2.0),
            brand_loyalty: rng.beta(2.0, 2.0),
        }
    }
}

fn segment_breakdown(profiles: &[CustomerProfile]) -> String {
    Segment::ALL
        .iter()
        .map(|seg| {
            let count = profiles.iter().filter(|p| p.segment == *seg).count();
            format!("{seg}={count}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

//! Shared primitive types used across the entire engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable, unique customer identifier (`CUST_000001`).
pub type CustomerId = String;

/// The canonical run identifier.
pub type RunId = String;

macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

/// Customer value tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Premium,
    Gold,
    Silver,
    Bronze,
}

impl Segment {
    pub const ALL: [Segment; 4] = [Self::Premium, Self::Gold, Self::Silver, Self::Bronze];

    /// Threshold rules, evaluated in priority order.
    pub fn classify(income: f64, age: u32) -> Self {
        if income > 100_000.0 && age > 35 {
            Self::Premium
        } else if income > 50_000.0 {
            Self::Gold
        } else if income > 25_000.0 {
            Self::Silver
        } else {
            Self::Bronze
        }
    }

    /// Scales the expected interaction volume of a customer.
    pub fn interaction_multiplier(&self) -> f64 {
        match self {
            Self::Premium => 3.0,
            Self::Gold => 2.0,
            Self::Silver => 1.5,
            Self::Bronze => 1.0,
        }
    }

    pub fn is_high_value(&self) -> bool {
        matches!(self, Self::Premium | Self::Gold)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Premium => "Premium",
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Bronze => "Bronze",
        }
    }
}

/// The three scored product categories. Declaration order is the
/// tie-break order everywhere a category is chosen or ranked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    FinancialServices,
    DigitalBanking,
    InvestmentProducts,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 3] = [
        Self::FinancialServices,
        Self::DigitalBanking,
        Self::InvestmentProducts,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinancialServices => "financial_services",
            Self::DigitalBanking => "digital_banking",
            Self::InvestmentProducts => "investment_products",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    PageView,
    Click,
    Purchase,
    Inquiry,
    Download,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageView => "page_view",
            Self::Click => "click",
            Self::Purchase => "purchase",
            Self::Inquiry => "inquiry",
            Self::Download => "download",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Mobile,
    Desktop,
    Tablet,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Web,
    MobileApp,
    Email,
    Sms,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::MobileApp => "mobile_app",
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    PremiumProductRecommendation,
    ProductRecommendation,
    EducationalContent,
    PromotionalOffer,
}

impl RecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PremiumProductRecommendation => "premium_product_recommendation",
            Self::ProductRecommendation => "product_recommendation",
            Self::EducationalContent => "educational_content",
            Self::PromotionalOffer => "promotional_offer",
        }
    }
}

/// A/B test arm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Control,
    VariantA,
    VariantB,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Self::Control, Self::VariantA, Self::VariantB];

    /// (mean, sd) of the multiplicative factor applied to expected
    /// engagement. Ordered control < variant_a < variant_b.
    pub fn engagement_factor(&self) -> (f64, f64) {
        match self {
            Self::Control => (0.8, 0.1),
            Self::VariantA => (1.0, 0.1),
            Self::VariantB => (1.2, 0.15),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::VariantA => "variant_a",
            Self::VariantB => "variant_b",
        }
    }
}

display_as_str!(
    Segment,
    ProductCategory,
    InteractionType,
    DeviceType,
    Channel,
    RecommendationType,
    Variant,
);

/// Round to a fixed number of decimal places for tabular output.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

//! Profile synthesis: ranges, segment rules, derived scores.

use personalization_core::{
    config::EngineConfig,
    error::SimError,
    profile_subsystem::{CustomerProfile, PreferenceDimension, Preferences, ProfileSynthesizer},
    types::{ProductCategory, Segment},
};
use std::collections::HashSet;

fn profiles(n: usize, seed: u64) -> Vec<CustomerProfile> {
    ProfileSynthesizer::new(EngineConfig::default_test().as_of)
        .generate_seeded(n, seed)
        .unwrap()
}

fn flat_prefs(value: f64) -> Preferences {
    Preferences {
        financial_services:  value,
        digital_banking:     value,
        investment_products: value,
        risk_tolerance:      value,
        tech_savviness:      value,
        price_sensitivity:   value,
        brand_loyalty:       value,
    }
}

#[test]
fn generated_values_stay_in_range() {
    for p in profiles(2000, 7) {
        assert!((18..=80).contains(&p.age), "age out of range: {}", p.age);
        assert!(p.income >= 1000.0, "income below floor: {}", p.income);
        assert!(
            (0.0..=1.0).contains(&p.behavior_score),
            "behavior_score out of range: {}",
            p.behavior_score
        );
        for (dim, value) in p.preferences.iter() {
            assert!(
                (0.0..=1.0).contains(&value),
                "{} out of range: {value}",
                dim.as_str()
            );
        }
    }
}

#[test]
fn segment_matches_threshold_rule() {
    assert_eq!(Segment::classify(150_000.0, 40), Segment::Premium);
    assert_eq!(Segment::classify(60_000.0, 20), Segment::Gold);
    assert_eq!(Segment::classify(10_000.0, 50), Segment::Bronze);
    assert_eq!(Segment::classify(30_000.0, 30), Segment::Silver);
    // Premium needs both conditions; a young high earner is Gold.
    assert_eq!(Segment::classify(150_000.0, 35), Segment::Gold);

    for p in profiles(1000, 11) {
        assert_eq!(
            p.segment,
            Segment::classify(p.income, p.age),
            "{} has segment {} for income {:.0} age {}",
            p.customer_id,
            p.segment,
            p.income,
            p.age
        );
    }
}

#[test]
fn behavior_score_is_fixed_weighted_blend() {
    for p in profiles(200, 3) {
        let prefs = &p.preferences;
        let expected = 0.3 * prefs.digital_banking
            + 0.3 * prefs.financial_services
            + 0.2 * (1.0 - prefs.price_sensitivity)
            + 0.2 * prefs.brand_loyalty;
        assert!((p.behavior_score - expected).abs() < 1e-12);
    }
}

#[test]
fn ids_are_sequential_and_unique() {
    let ps = profiles(25, 1);
    assert_eq!(ps[0].customer_id, "CUST_000001");
    assert_eq!(ps[24].customer_id, "CUST_000025");
    let ids: HashSet<_> = ps.iter().map(|p| p.customer_id.as_str()).collect();
    assert_eq!(ids.len(), 25);
}

#[test]
fn last_interaction_is_within_thirty_days() {
    let as_of = EngineConfig::default_test().as_of;
    for p in profiles(500, 5) {
        let age = as_of - p.last_interaction;
        assert!(
            age.num_days() >= 0 && age.num_days() < 30,
            "last_interaction {} days ago",
            age.num_days()
        );
    }
}

#[test]
fn younger_customers_skew_digital() {
    let ps = profiles(3000, 21);
    let mean_digital = |young: bool| {
        let selected: Vec<f64> = ps
            .iter()
            .filter(|p| (p.age < 50) == young)
            .map(|p| p.preferences.digital_banking)
            .collect();
        selected.iter().sum::<f64>() / selected.len() as f64
    };
    let young = mean_digital(true);
    let old = mean_digital(false);
    // Beta(3,2) mean 0.6 vs Beta(1,3) mean 0.25
    assert!(young > old + 0.2, "young={young:.3} old={old:.3}");
}

#[test]
fn zero_population_is_rejected() {
    let err = ProfileSynthesizer::new(EngineConfig::default_test().as_of)
        .generate_seeded(0, 42)
        .unwrap_err();
    assert!(matches!(err, SimError::InvalidParameter { name: "population", .. }));
}

#[test]
fn constructor_derives_segment_and_score() {
    let as_of = EngineConfig::default_test().as_of;
    let p = CustomerProfile::new("CUST_000001".into(), 90, 200_000.0, flat_prefs(0.5), as_of);
    assert_eq!(p.age, 80, "age should clamp to 80");
    assert_eq!(p.segment, Segment::Premium);
    assert!((p.behavior_score - 0.5).abs() < 1e-12);
}

#[test]
fn top_category_breaks_ties_by_declaration_order() {
    let mut prefs = flat_prefs(0.5);
    prefs.investment_products = 0.4;
    assert_eq!(prefs.top_category(), ProductCategory::FinancialServices);

    prefs.digital_banking = 0.9;
    assert_eq!(prefs.top_category(), ProductCategory::DigitalBanking);

    assert_eq!(prefs.get(PreferenceDimension::DigitalBanking), 0.9);
}

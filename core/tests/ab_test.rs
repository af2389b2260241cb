//! A/B simulation: fan-out, variant ordering, conversion bounds.

use personalization_core::{
    ab_test_subsystem::{summarize, AbTestSimulator},
    config::EngineConfig,
    engine::PersonalizationEngine,
    rng::{RngBank, SubsystemSlot},
    types::Variant,
};

#[test]
fn fans_out_three_records_per_recommendation() {
    let mut engine = PersonalizationEngine::new(EngineConfig::default_test()).unwrap();
    let dataset = engine.run().unwrap();
    let r = dataset.recommendations.len();

    assert_eq!(dataset.ab_tests.len(), 3 * r);
    for (rec, chunk) in dataset.recommendations.iter().zip(dataset.ab_tests.chunks(3)) {
        let variants: Vec<_> = chunk.iter().map(|a| a.variant).collect();
        assert_eq!(variants, Variant::ALL.to_vec());
        for a in chunk {
            assert_eq!(a.customer_id, rec.customer_id);
            assert_eq!(a.recommendation_type, rec.recommendation_type);
            assert_eq!(a.expected_engagement, rec.expected_engagement);
            assert_eq!(a.test_id, format!("TEST_{}_{}", rec.customer_id, a.variant));
            assert!((0.0..=1.0).contains(&a.actual_engagement));
            assert!(a.conversion_probability() <= 0.3);
        }
    }
}

#[test]
fn empty_table_yields_no_records() {
    let mut rng = RngBank::new(1).for_subsystem(SubsystemSlot::AbTest);
    assert!(AbTestSimulator::simulate(&[], &mut rng).is_empty());
}

#[test]
fn variants_show_simulated_uplift() {
    let config = EngineConfig::default_test().with_population(500);
    let dataset = PersonalizationEngine::new(config).unwrap().run().unwrap();

    let summary = summarize(&dataset.ab_tests);
    assert_eq!(summary.len(), 3);
    let engagement: Vec<_> = summary.iter().map(|s| s.mean_actual_engagement).collect();
    assert!(
        engagement[0] < engagement[1] && engagement[1] < engagement[2],
        "expected control < variant_a < variant_b, got {engagement:?}"
    );
    for s in &summary {
        assert_eq!(s.records, dataset.recommendations.len());
        assert!(s.conversion_rate <= 0.3, "{} converts at {}", s.variant, s.conversion_rate);
    }
}

#[test]
fn summarize_reports_empty_variants() {
    let summary = summarize(&[]);
    assert_eq!(summary.len(), 3);
    assert!(summary.iter().all(|s| s.records == 0 && s.conversion_rate == 0.0));
}

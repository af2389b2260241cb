//! Orchestration: table shape, enrichment, preconditions, stage events.

use personalization_core::{
    config::EngineConfig,
    engine::PersonalizationEngine,
    error::SimError,
    event::PipelineEvent,
};

#[test]
fn every_customer_gets_min_top_k_recommendations() {
    let config = EngineConfig::default_test().with_population(80);
    let mut engine = PersonalizationEngine::new(config).unwrap();
    let dataset = engine.run().unwrap();

    assert_eq!(dataset.profiles.len(), 80);
    // top_k = 5 but there are only three categories.
    assert_eq!(dataset.recommendations.len(), 80 * 3);

    for p in &dataset.profiles {
        let rows: Vec<_> = dataset
            .recommendations
            .iter()
            .filter(|r| r.customer_id == p.customer_id)
            .collect();
        assert_eq!(rows.len(), 3, "{} has {} rows", p.customer_id, rows.len());
        for r in rows {
            assert_eq!(r.customer_segment, p.segment);
            assert_eq!(r.customer_behavior_score, p.behavior_score);
            assert_eq!(r.timestamp, engine.config().as_of);
        }
    }
}

#[test]
fn smaller_top_k_limits_rows() {
    let mut config = EngineConfig::default_test().with_population(40);
    config.top_k = 2;
    let dataset = PersonalizationEngine::new(config).unwrap().run().unwrap();
    assert_eq!(dataset.recommendations.len(), 80);
}

#[test]
fn invalid_parameters_fail_before_running() {
    let err = PersonalizationEngine::new(EngineConfig::default_test().with_population(0)).err();
    assert!(matches!(err, Some(SimError::InvalidParameter { name: "population", .. })));

    let mut config = EngineConfig::default_test();
    config.days_back = 0;
    let err = PersonalizationEngine::new(config).err();
    assert!(matches!(err, Some(SimError::InvalidParameter { name: "days_back", .. })));

    let mut config = EngineConfig::default_test();
    config.top_k = 0;
    assert!(PersonalizationEngine::new(config).is_err());
}

#[test]
fn event_for_unknown_customer_aborts_pipeline() {
    let config = EngineConfig::default_test().with_population(10);
    let mut engine = PersonalizationEngine::new(config).unwrap();
    let profiles = engine.generate_profiles().unwrap();
    let mut interactions = engine.generate_interactions(&profiles);

    let mut stray = interactions
        .first()
        .cloned()
        .expect("10 customers should produce at least one event");
    stray.customer_id = "CUST_999999".into();
    interactions.push(stray);

    let err = engine.run_pipeline(&profiles, &interactions).unwrap_err();
    match err {
        SimError::UnknownCustomer { customer_id, .. } => assert_eq!(customer_id, "CUST_999999"),
        other => panic!("expected UnknownCustomer, got {other:?}"),
    }
}

#[test]
fn customers_without_events_fall_back_to_preferences() {
    let config = EngineConfig::default_test().with_population(30);
    let mut engine = PersonalizationEngine::new(config).unwrap();
    let profiles = engine.generate_profiles().unwrap();

    let rows = engine.run_pipeline(&profiles, &[]).unwrap();
    assert_eq!(rows.len(), 90);

    // With no behavior the first row is the customer's top preference.
    for p in &profiles {
        let first = rows.iter().find(|r| r.customer_id == p.customer_id).unwrap();
        let top = p.preferences.category(p.preferences.top_category());
        let expected = (top * p.behavior_score * 1.2).min(0.95);
        assert!((first.expected_engagement - expected).abs() < 1e-3);
    }
}

#[test]
fn stages_are_recorded_in_order() {
    let config = EngineConfig::default_test().with_population(20);
    let mut engine = PersonalizationEngine::new(config).unwrap();
    let dataset = engine.run().unwrap();

    let names: Vec<_> = engine.events().iter().map(|e| e.type_name()).collect();
    assert_eq!(
        names,
        vec![
            "run_initialized",
            "profiles_generated",
            "interactions_generated",
            "recommendations_ranked",
            "ab_test_simulated",
        ]
    );
    assert_eq!(
        engine.events()[1],
        PipelineEvent::ProfilesGenerated { count: 20 }
    );
    match &engine.events()[4] {
        PipelineEvent::AbTestSimulated { count, .. } => assert_eq!(*count, dataset.ab_tests.len()),
        other => panic!("unexpected event {other:?}"),
    }
}

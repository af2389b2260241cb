//! Dataset persistence round-trip through the SQLite store.

use personalization_core::{
    config::EngineConfig,
    engine::PersonalizationEngine,
    store::SimStore,
};

#[test]
fn saved_dataset_counts_match() {
    let config = EngineConfig::default_test().with_population(50);
    let mut engine = PersonalizationEngine::new(config.clone()).unwrap();
    let dataset = engine.run().unwrap();

    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store.insert_run("store-test", &config, "0.1.0-test").expect("insert run");
    store.append_events("store-test", engine.events()).expect("events");
    store.save_dataset("store-test", &dataset).expect("save");

    assert_eq!(store.profile_count("store-test").unwrap(), 50);
    assert_eq!(
        store.interaction_count("store-test").unwrap(),
        dataset.interactions.len() as i64
    );
    assert_eq!(
        store.recommendation_count("store-test").unwrap(),
        dataset.recommendations.len() as i64
    );
    assert_eq!(
        store.ab_test_count("store-test").unwrap(),
        dataset.ab_tests.len() as i64
    );

    let segments: i64 = store
        .segment_counts("store-test")
        .unwrap()
        .iter()
        .map(|(_, n)| n)
        .sum();
    assert_eq!(segments, 50);
}

#[test]
fn conversions_by_variant_cover_every_arm() {
    let config = EngineConfig::default_test().with_population(30);
    let dataset = PersonalizationEngine::new(config.clone()).unwrap().run().unwrap();

    let store = SimStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.insert_run("variant-test", &config, "0.1.0-test").unwrap();
    store.save_dataset("variant-test", &dataset).unwrap();

    let rows = store.conversions_by_variant("variant-test").unwrap();
    let variants: Vec<_> = rows.iter().map(|(v, _, _)| v.as_str()).collect();
    assert_eq!(variants, vec!["control", "variant_a", "variant_b"]);

    let converted_in_memory = dataset.ab_tests.iter().filter(|a| a.converted).count() as i64;
    let converted_in_store: i64 = rows.iter().map(|(_, _, c)| c).sum();
    assert_eq!(converted_in_store, converted_in_memory);
}

#[test]
fn event_log_round_trips_in_order() {
    let config = EngineConfig::default_test().with_population(10);
    let mut engine = PersonalizationEngine::new(config.clone()).unwrap();
    engine.run().unwrap();

    let store = SimStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.insert_run("events-test", &config, "0.1.0-test").unwrap();
    store.append_events("events-test", engine.events()).unwrap();

    let entries = store.events_for_run("events-test").unwrap();
    assert_eq!(entries.len(), engine.events().len());
    assert_eq!(entries[0].event_type, "run_initialized");
    assert!(entries[0].payload.contains("\"seed\":42"), "{}", entries[0].payload);
    assert!(entries.windows(2).all(|w| w[0].seq < w[1].seq));
}

#[test]
fn run_seed_survives_values_above_i64_max() {
    let seed = 0xDEAD_BEEF_CAFE_1234_u64;
    assert!(seed > i64::MAX as u64);
    let config = EngineConfig::default_test().with_seed(seed);

    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store.insert_run("big-seed", &config, "0.1.0-test").expect("insert run");

    assert_eq!(store.run_seed("big-seed").unwrap(), Some(seed));
    assert_eq!(store.run_seed("no-such-run").unwrap(), None);
}

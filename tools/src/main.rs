//! sim-runner: headless dataset generator for the personalization engine.
//!
//! Usage:
//!   sim-runner --seed 42 --population 1000 --out-dir ./data
//!   sim-runner --config run.json --as-of 2024-01-01T00:00:00Z --db run.db

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use personalization_core::{
    ab_test_subsystem::summarize,
    config::EngineConfig,
    dataset::Dataset,
    engine::PersonalizationEngine,
    store::SimStore,
};
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = build_config(&args)?;
    let out_dir = flag_value(&args, "--out-dir").unwrap_or("./data");
    let db = flag_value(&args, "--db");

    println!("Personalization engine sim-runner");
    println!("  seed:        {}", config.seed);
    println!("  population:  {}", config.population);
    println!("  days_back:   {}", config.days_back);
    println!("  top_k:       {}", config.top_k);
    println!("  as_of:       {}", config.as_of.to_rfc3339());
    println!("  out_dir:     {out_dir}");
    println!();

    let mut engine = PersonalizationEngine::new(config.clone())?;
    let dataset = engine.run()?;

    write_csvs(Path::new(out_dir), &dataset)?;

    if let Some(db) = db {
        let store = SimStore::open(db)?;
        store.migrate()?;
        let run_id = format!("run-{}-{}", config.seed, config.as_of.timestamp());
        store.insert_run(&run_id, &config, env!("CARGO_PKG_VERSION"))?;
        store.append_events(&run_id, engine.events())?;
        store.save_dataset(&run_id, &dataset)?;
        println!("  saved run {run_id} to {db}");
    }

    print_summary(&dataset);
    Ok(())
}

/// Config file first (if given), then individual flags on top.
fn build_config(args: &[String]) -> Result<EngineConfig> {
    let mut config = match flag_value(args, "--config") {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = parse_arg(args, "--seed")? {
        config.seed = seed;
    }
    if let Some(population) = parse_arg(args, "--population")? {
        config.population = population;
    }
    if let Some(days_back) = parse_arg(args, "--days-back")? {
        config.days_back = days_back;
    }
    if let Some(top_k) = parse_arg(args, "--top-k")? {
        config.top_k = top_k;
    }
    if let Some(as_of) = flag_value(args, "--as-of") {
        config.as_of = DateTime::parse_from_rfc3339(as_of)
            .with_context(|| format!("--as-of expects an RFC 3339 timestamp, got '{as_of}'"))?
            .with_timezone(&Utc);
    }
    Ok(config)
}

fn write_csvs(out_dir: &Path, dataset: &Dataset) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Cannot create {}", out_dir.display()))?;
    write_csv(&out_dir.join("customer_profiles.csv"), &dataset.profile_rows())?;
    write_csv(&out_dir.join("interactions.csv"), &dataset.interactions)?;
    write_csv(&out_dir.join("recommendations.csv"), &dataset.recommendations)?;
    write_csv(&out_dir.join("ab_test_results.csv"), &dataset.ab_tests)?;
    Ok(())
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot write {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    log::info!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn print_summary(dataset: &Dataset) {
    println!("=== DATASET SUMMARY ===");
    println!("  customer profiles: {}", dataset.profiles.len());
    println!("  interactions:      {}", dataset.interactions.len());
    println!("  recommendations:   {}", dataset.recommendations.len());
    println!("  a/b test records:  {}", dataset.ab_tests.len());

    println!();
    println!("=== A/B TEST OUTCOMES ===");
    for s in summarize(&dataset.ab_tests) {
        println!(
            "  {:<10} | n={:<6} | conversions={:<5} | rate={:.2}% | mean engagement={:.3}",
            s.variant.as_str(),
            s.records,
            s.conversions,
            s.conversion_rate * 100.0,
            s.mean_actual_engagement
        );
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// A flag that is present but unparsable is an error, not a default.
fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<Option<T>> {
    match flag_value(args, flag) {
        None => Ok(None),
        Some(raw) => match raw.parse() {
            Ok(v) => Ok(Some(v)),
            Err(_) => bail!("{flag} expects a non-negative integer, got '{raw}'"),
        },
    }
}

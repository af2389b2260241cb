//! Customer personalization engine.
//!
//! Synthesizes customer profiles, simulates their interactions, scores
//! category affinity from recent behavior, ranks typed recommendations
//! and simulates A/B outcomes. Every draw comes from a seeded RngBank, so
//! a (config, seed) pair always reproduces the same dataset.

pub mod ab_test_subsystem;
pub mod categorical;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod event;
pub mod interaction_subsystem;
pub mod profile_subsystem;
pub mod recommendation_subsystem;
pub mod rng;
pub mod scoring_subsystem;
pub mod store;
pub mod types;

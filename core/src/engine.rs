//! The personalization engine: sequences the pipeline over a population.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Profile synthesis
//!   2. Interaction simulation
//!   3. Per customer: recent window -> real-time scores -> ranking
//!   4. A/B test simulation over the recommendation table
//!
//! RULES:
//!   - All randomness flows through the RngBank; no component owns a seed.
//!   - Each customer's scoring and ranking reads only that customer's
//!     profile and events, so customer order only affects row order.
//!   - Every stage records a PipelineEvent.

use crate::{
    ab_test_subsystem::{AbTestRecord, AbTestSimulator},
    config::EngineConfig,
    dataset::{Dataset, RecommendationRow},
    error::{SimError, SimResult},
    event::PipelineEvent,
    interaction_subsystem::{InteractionEvent, InteractionSimulator},
    profile_subsystem::{CustomerProfile, ProfileSynthesizer},
    recommendation_subsystem::RecommendationRanker,
    rng::{RngBank, SubsystemSlot},
    scoring_subsystem::{recent_window, RealTimeScorer},
};
use std::collections::{HashMap, HashSet};

pub struct PersonalizationEngine {
    config:   EngineConfig,
    rng_bank: RngBank,
    events:   Vec<PipelineEvent>,
}

impl PersonalizationEngine {
    /// Validate the configuration and seed the bank. Fails before any
    /// draw is made if a parameter is invalid.
    pub fn new(config: EngineConfig) -> SimResult<Self> {
        config.validate()?;
        let events = vec![PipelineEvent::RunInitialized {
            seed:       config.seed,
            population: config.population,
            days_back:  config.days_back,
            top_k:      config.top_k,
        }];
        Ok(Self {
            rng_bank: RngBank::new(config.seed),
            config,
            events,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Stage events recorded so far, in order.
    pub fn events(&self) -> &[PipelineEvent] {
        &self.events
    }

    /// Run every stage and collect the four tables.
    pub fn run(&mut self) -> SimResult<Dataset> {
        let profiles = self.generate_profiles()?;
        let interactions = self.generate_interactions(&profiles);
        let recommendations = self.run_pipeline(&profiles, &interactions)?;
        let ab_tests = self.simulate_ab_test(&recommendations);
        Ok(Dataset {
            profiles,
            interactions,
            recommendations,
            ab_tests,
        })
    }

    pub fn generate_profiles(&mut self) -> SimResult<Vec<CustomerProfile>> {
        let mut rng = self.rng_bank.for_subsystem(SubsystemSlot::Profile);
        let profiles =
            ProfileSynthesizer::new(self.config.as_of).generate(self.config.population, &mut rng)?;
        self.events.push(PipelineEvent::ProfilesGenerated { count: profiles.len() });
        Ok(profiles)
    }

    pub fn generate_interactions(&mut self, profiles: &[CustomerProfile]) -> Vec<InteractionEvent> {
        let simulator = InteractionSimulator::new(self.rng_bank, self.config.as_of);
        let interactions = simulator.generate(profiles, self.config.days_back);

        let active: HashSet<&str> = interactions.iter().map(|e| e.customer_id.as_str()).collect();
        let customers_without_events = profiles
            .iter()
            .filter(|p| !active.contains(p.customer_id.as_str()))
            .count();
        if customers_without_events == profiles.len() && !profiles.is_empty() {
            log::warn!("interaction: no customer produced any events; scores will equal base preferences");
        }

        self.events.push(PipelineEvent::InteractionsGenerated {
            count: interactions.len(),
            customers_without_events,
        });
        interactions
    }

    /// Score and rank every customer, flattening into one table.
    ///
    /// Every interaction must reference one of `profiles`; an event for an
    /// unknown customer is a broken precondition and aborts the run.
    pub fn run_pipeline(
        &mut self,
        profiles: &[CustomerProfile],
        interactions: &[InteractionEvent],
    ) -> SimResult<Vec<RecommendationRow>> {
        let by_customer = group_by_customer(profiles, interactions)?;
        let ranker = RecommendationRanker::new(self.config.as_of);
        let mut rows = Vec::with_capacity(profiles.len() * self.config.top_k.min(3));

        for profile in profiles {
            let customer_events = by_customer
                .get(profile.customer_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let window = recent_window(
                customer_events,
                self.config.as_of,
                self.config.lookback_days,
                self.config.recent_window,
            );
            let scores = RealTimeScorer::score(profile, &window);

            let mut rng = self
                .rng_bank
                .for_customer(SubsystemSlot::Recommendation, &profile.customer_id);
            let recs = ranker.rank(profile, &scores, self.config.top_k, &mut rng);

            log::debug!(
                "pipeline: {} window={} scores={:?} recs={}",
                profile.customer_id,
                window.len(),
                scores,
                recs.len()
            );
            rows.extend(recs.into_iter().map(|r| RecommendationRow::new(r, profile)));
        }

        log::info!(
            "pipeline: ranked {} recommendations for {} customers",
            rows.len(),
            profiles.len()
        );
        self.events.push(PipelineEvent::RecommendationsRanked { count: rows.len() });
        Ok(rows)
    }

    pub fn simulate_ab_test(&mut self, recommendations: &[RecommendationRow]) -> Vec<AbTestRecord> {
        let mut rng = self.rng_bank.for_subsystem(SubsystemSlot::AbTest);
        let records = AbTestSimulator::simulate(recommendations, &mut rng);
        let conversions = records.iter().filter(|r| r.converted).count();
        self.events.push(PipelineEvent::AbTestSimulated {
            count: records.len(),
            conversions,
        });
        records
    }
}

fn group_by_customer<'a>(
    profiles: &'a [CustomerProfile],
    interactions: &'a [InteractionEvent],
) -> SimResult<HashMap<&'a str, Vec<&'a InteractionEvent>>> {
    let mut by_customer: HashMap<&str, Vec<&InteractionEvent>> = profiles
        .iter()
        .map(|p| (p.customer_id.as_str(), Vec::new()))
        .collect();
    for event in interactions {
        match by_customer.get_mut(event.customer_id.as_str()) {
            Some(events) => events.push(event),
            None => {
                return Err(SimError::UnknownCustomer {
                    event_id:    event.event_id.clone(),
                    customer_id: event.customer_id.clone(),
                })
            }
        }
    }
    Ok(by_customer)
}

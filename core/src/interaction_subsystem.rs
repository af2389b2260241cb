//! Interaction event simulation.
//!
//! Emits a bounded stream of events per customer. Volume scales with the
//! customer's tier and behavior score; the content category is the
//! customer's strongest product preference, not a draw.
//!
//! Each customer draws from its own stream (see `RngBank::for_customer`),
//! so the events of one customer do not depend on the rest of the
//! population.

use crate::{
    categorical::WeightedTable,
    profile_subsystem::CustomerProfile,
    rng::{RngBank, SubsystemRng, SubsystemSlot},
    types::{round_to, Channel, CustomerId, DeviceType, InteractionType, ProductCategory},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const BASE_INTERACTION_RATE: f64 = 10.0;
pub const ENGAGEMENT_DURATION_SCALE: f64 = 30.0;
pub const ENGAGEMENT_DURATION_FLOOR: f64 = 1.0;
pub const ENGAGEMENT_NOISE_SD: f64 = 0.1;

pub static INTERACTION_TYPES: WeightedTable<InteractionType> = WeightedTable::new(&[
    (InteractionType::PageView, 0.4),
    (InteractionType::Click, 0.3),
    (InteractionType::Purchase, 0.1),
    (InteractionType::Inquiry, 0.15),
    (InteractionType::Download, 0.05),
]);

pub static DEVICE_TYPES: WeightedTable<DeviceType> = WeightedTable::new(&[
    (DeviceType::Mobile, 0.6),
    (DeviceType::Desktop, 0.3),
    (DeviceType::Tablet, 0.1),
]);

pub static CHANNELS: WeightedTable<Channel> = WeightedTable::new(&[
    (Channel::Web, 0.4),
    (Channel::MobileApp, 0.4),
    (Channel::Email, 0.15),
    (Channel::Sms, 0.05),
]);

/// One simulated customer interaction. Immutable once generated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionEvent {
    pub event_id:            String,
    pub customer_id:         CustomerId,
    pub timestamp:           DateTime<Utc>,
    pub interaction_type:    InteractionType,
    pub content_category:    ProductCategory,
    /// Seconds.
    pub engagement_duration: f64,
    pub engagement_score:    f64,
    pub device_type:         DeviceType,
    pub channel:             Channel,
}

pub struct InteractionSimulator {
    rng_bank: RngBank,
    as_of:    DateTime<Utc>,
}

impl InteractionSimulator {
    pub fn new(rng_bank: RngBank, as_of: DateTime<Utc>) -> Self {
        Self { rng_bank, as_of }
    }

    /// Events for every profile, concatenated in profile order.
    /// `days_back` must be positive; the engine validates it up front.
    pub fn generate(&self, profiles: &[CustomerProfile], days_back: u32) -> Vec<InteractionEvent> {
        let mut events = Vec::new();
        for profile in profiles {
            let mut rng = self
                .rng_bank
                .for_customer(SubsystemSlot::Interaction, &profile.customer_id);
            events.extend(self.generate_for(profile, days_back, &mut rng));
        }
        log::info!(
            "interaction: generated {} events for {} customers over {days_back} days",
            events.len(),
            profiles.len()
        );
        events
    }

    pub fn generate_for(
        &self,
        profile: &CustomerProfile,
        days_back: u32,
        rng: &mut SubsystemRng,
    ) -> Vec<InteractionEvent> {
        let count = Self::interaction_count(profile, rng);
        let category = profile.preferences.top_category();

        let mut events = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = Duration::days(rng.next_u64_below(u64::from(days_back.max(1))) as i64)
                + Duration::hours(rng.next_u64_below(24) as i64)
                + Duration::minutes(rng.next_u64_below(60) as i64);
            let interaction_type = INTERACTION_TYPES.sample(rng);
            let duration = rng
                .exponential(ENGAGEMENT_DURATION_SCALE)
                .max(ENGAGEMENT_DURATION_FLOOR);
            let engagement = (profile.behavior_score + rng.normal(0.0, ENGAGEMENT_NOISE_SD))
                .clamp(0.0, 1.0);
            let device_type = DEVICE_TYPES.sample(rng);
            let channel = CHANNELS.sample(rng);
            let event_id = uuid::Builder::from_random_bytes(rng.next_bytes16())
                .into_uuid()
                .to_string();

            events.push(InteractionEvent {
                event_id,
                customer_id: profile.customer_id.clone(),
                timestamp: self.as_of - offset,
                interaction_type,
                content_category: category,
                engagement_duration: round_to(duration, 2),
                engagement_score: round_to(engagement, 3),
                device_type,
                channel,
            });
        }

        log::debug!(
            "interaction: {} segment={} behavior={:.3} events={count} category={category}",
            profile.customer_id,
            profile.segment,
            profile.behavior_score
        );
        events
    }

    /// floor(Poisson(10) * segment multiplier * behavior score).
    fn interaction_count(profile: &CustomerProfile, rng: &mut SubsystemRng) -> usize {
        let base = rng.poisson(BASE_INTERACTION_RATE) as f64;
        (base * profile.segment.interaction_multiplier() * profile.behavior_score).floor() as usize
    }
}

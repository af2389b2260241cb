//! Deterministic random number generation.
//!
//! RULE: Nothing in the engine may call any platform RNG.
//! All randomness flows through SubsystemRng instances derived
//! from the single master seed on the EngineConfig.
//!
//! Each component gets its own RNG stream, seeded deterministically
//! from (master_seed XOR slot_index). Components that work per customer
//! additionally mix in a hash of the customer id, so:
//!   - Adding a new component never changes existing components' streams.
//!   - A customer's draws do not depend on where it sits in the population.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// A named, deterministic RNG for a single component.
pub struct SubsystemRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SubsystemRng {
    /// Create an RNG from the master seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, subsystem_index: u64) -> Self {
        let derived_seed = master_seed ^ subsystem_index.wrapping_mul(GOLDEN_GAMMA);
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Fill 16 random bytes (used for event ids).
    pub fn next_bytes16(&mut self) -> [u8; 16] {
        use rand::RngCore;
        let mut bytes = [0u8; 16];
        self.inner.fill_bytes(&mut bytes);
        bytes
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Gaussian sample via Box-Muller. One sample per call, the
    /// companion value is discarded so the stream stays stateless.
    pub fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        let u1 = 1.0 - self.next_f64(); // (0, 1]
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        mean + sd * z
    }

    /// exp(N(mu, sigma)).
    pub fn log_normal(&mut self, mu: f64, sigma: f64) -> f64 {
        self.normal(mu, sigma).exp()
    }

    /// Exponential distribution parameterised by its mean (`scale`).
    pub fn exponential(&mut self, scale: f64) -> f64 {
        let u = 1.0 - self.next_f64();
        -scale * u.ln()
    }

    /// Poisson count. Knuth's product method for small lambda,
    /// rounded normal approximation above 30 where exp(-lambda) underflows
    /// precision.
    pub fn poisson(&mut self, lambda: f64) -> u64 {
        if lambda <= 0.0 {
            return 0;
        }
        if lambda > 30.0 {
            return self.normal(lambda, lambda.sqrt()).round().max(0.0) as u64;
        }
        let limit = (-lambda).exp();
        let mut k = 0u64;
        let mut p = 1.0;
        loop {
            p *= self.next_f64();
            if p <= limit {
                return k;
            }
            k += 1;
        }
    }

    /// Gamma(shape, 1) via Marsaglia-Tsang. Shapes below 1 use the
    /// U^(1/shape) boost.
    pub fn gamma(&mut self, shape: f64) -> f64 {
        assert!(shape > 0.0, "gamma shape must be > 0");
        if shape < 1.0 {
            let u = 1.0 - self.next_f64();
            return self.gamma(shape + 1.0) * u.powf(1.0 / shape);
        }
        let d = shape - 1.0 / 3.0;
        let c = 1.0 / (9.0 * d).sqrt();
        loop {
            let x = self.normal(0.0, 1.0);
            let v = 1.0 + c * x;
            if v <= 0.0 {
                continue;
            }
            let v = v * v * v;
            let u = 1.0 - self.next_f64();
            if u.ln() < 0.5 * x * x + d - d * v + d * v.ln() {
                return d * v;
            }
        }
    }

    /// Beta(alpha, beta) as X / (X + Y) with X, Y gamma distributed.
    pub fn beta(&mut self, alpha: f64, beta: f64) -> f64 {
        let x = self.gamma(alpha);
        let y = self.gamma(beta);
        x / (x + y)
    }
}

/// All component RNGs for a single run, indexed by stable slot.
#[derive(Debug, Clone, Copy)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_subsystem(&self, slot: SubsystemSlot) -> SubsystemRng {
        SubsystemRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }

    /// Stream for one customer within a slot. Independent of the order in
    /// which customers are processed.
    pub fn for_customer(&self, slot: SubsystemSlot, customer_id: &str) -> SubsystemRng {
        let mixed = self.master_seed ^ fnv1a(customer_id.as_bytes()).rotate_left(17);
        SubsystemRng::new(mixed, slot as u64).with_name(slot.name())
    }
}

/// 64-bit FNV-1a. Stable across platforms and releases, unlike
/// std's DefaultHasher.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Stable slot assignments.
/// NEVER reorder or remove entries. Append only.
/// Reordering changes every component's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SubsystemSlot {
    Profile = 0,
    Interaction = 1,
    Recommendation = 2,
    AbTest = 3,
    // Add new components here, append only.
}

impl SubsystemSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Interaction => "interaction",
            Self::Recommendation => "recommendation",
            Self::AbTest => "ab_test",
        }
    }
}

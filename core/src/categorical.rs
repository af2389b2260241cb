//! Explicit value/weight tables for categorical draws.
//!
//! Sampling is a single cumulative roll against the table in declaration
//! order, so the draw consumes exactly one `next_f64` regardless of the
//! underlying PRNG.

use crate::rng::SubsystemRng;

#[derive(Debug, Clone, Copy)]
pub struct WeightedTable<T: 'static> {
    entries: &'static [(T, f64)],
}

impl<T: Copy + 'static> WeightedTable<T> {
    /// Build a table. Weights are expected to sum to 1.0; they are not
    /// renormalised.
    pub const fn new(entries: &'static [(T, f64)]) -> Self {
        assert!(!entries.is_empty(), "weighted table must not be empty");
        Self { entries }
    }

    pub fn entries(&self) -> &'static [(T, f64)] {
        self.entries
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Pick the entry whose cumulative weight first exceeds `roll`.
    /// Rolls past the final cumulative weight (float error) land on the
    /// last entry.
    pub fn pick(&self, roll: f64) -> T {
        let mut cumulative = 0.0;
        for (value, weight) in self.entries {
            cumulative += weight;
            if roll < cumulative {
                return *value;
            }
        }
        self.entries[self.entries.len() - 1].0
    }

    pub fn sample(&self, rng: &mut SubsystemRng) -> T {
        self.pick(rng.next_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static LETTERS: WeightedTable<char> =
        WeightedTable::new(&[('a', 0.5), ('b', 0.3), ('c', 0.2)]);

    #[test]
    fn pick_walks_cumulative_weights() {
        assert_eq!(LETTERS.pick(0.0), 'a');
        assert_eq!(LETTERS.pick(0.49), 'a');
        assert_eq!(LETTERS.pick(0.5), 'b');
        assert_eq!(LETTERS.pick(0.79), 'b');
        assert_eq!(LETTERS.pick(0.8), 'c');
    }

    #[test]
    fn overflowing_roll_falls_back_to_last_entry() {
        assert_eq!(LETTERS.pick(1.0), 'c');
        assert_eq!(LETTERS.pick(7.5), 'c');
    }

    #[test]
    fn weights_sum_to_one() {
        assert!((LETTERS.total_weight() - 1.0).abs() < 1e-12);
    }
}

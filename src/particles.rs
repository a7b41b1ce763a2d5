//! Decorative particle field drifting down over the hero.
//!
//! Every particle falls the full height of the hero on a loop, drifting
//! horizontally between two random positions. Randomness comes from a
//! `ChaCha8Rng` seeded from config so the generated markup is reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Stagger between consecutive particle start times.
const DELAY_STEP_S: f64 = 0.2;

/// One particle's animation parameters. Positions are percentages of the
/// hero width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    /// Horizontal position before the first fall.
    pub start_x: f64,
    /// Horizontal position at the top of each fall.
    pub drift_from: f64,
    /// Horizontal position at the bottom of each fall, in `[50, 150)`.
    pub drift_to: f64,
    /// Seconds per fall, in `[5, 10)`.
    pub duration_s: f64,
    /// Seconds before the first fall.
    pub delay_s: f64,
}

impl Particle {
    /// Inline CSS custom properties consumed by `static/style.css`.
    pub fn style(&self) -> String {
        format!(
            "--x0: {:.2}%; --x1: {:.2}%; --x2: {:.2}%; --dur: {:.2}s; --delay: {:.2}s;",
            self.start_x, self.drift_from, self.drift_to, self.duration_s, self.delay_s
        )
    }
}

/// Generate `count` particles from `seed`.
pub fn particle_field(count: usize, seed: u64) -> Vec<Particle> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let start_x = rng.gen_range(0.0..100.0);
            let drift_from = rng.gen_range(0.0..100.0);
            let drift_to = rng.gen_range(0.0..100.0) + 50.0;
            let duration_s = 5.0 + rng.gen_range(0.0..5.0);
            Particle {
                start_x,
                drift_from,
                drift_to,
                duration_s,
                delay_s: i as f64 * DELAY_STEP_S,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_field() {
        assert_eq!(particle_field(20, 7), particle_field(20, 7));
    }

    #[test]
    fn different_seeds_differ() {
        assert_ne!(particle_field(20, 1), particle_field(20, 2));
    }

    #[test]
    fn values_stay_in_range() {
        for p in particle_field(200, 42) {
            assert!((0.0..100.0).contains(&p.start_x));
            assert!((0.0..100.0).contains(&p.drift_from));
            assert!((50.0..150.0).contains(&p.drift_to));
            assert!((5.0..10.0).contains(&p.duration_s));
        }
    }

    #[test]
    fn delays_are_staggered() {
        let field = particle_field(3, 42);
        let delays: Vec<f64> = field.iter().map(|p| p.delay_s).collect();
        assert_eq!(delays[0], 0.0);
        assert!((delays[2] - 0.4).abs() < 1e-9);
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(particle_field(0, 42).is_empty());
    }

    #[test]
    fn style_lists_custom_properties() {
        let style = particle_field(1, 42)[0].style();
        assert!(style.contains("--dur:"));
        assert!(style.contains("--delay: 0.00s"));
    }
}

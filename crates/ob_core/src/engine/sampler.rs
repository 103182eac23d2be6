//! Stochastic plate-appearance resolution.
//!
//! Outcomes are drawn in two stages so a batter's hit quality never leaks
//! into how often they reach base: first {hit, walk, out} from the top-level
//! rates, then the hit type from the conditional split. Both stages consume
//! exactly one uniform draw, which keeps replay streams compact and the
//! marginal probability of each outcome equal to the configured product.

use rand::Rng;

use super::outcome::PlateOutcome;
use crate::models::player::RateLine;

/// Draw one plate-appearance outcome for the given rate line.
///
/// Assumes `rates` already passed [`RateLine::validate`]; the residual
/// bucket of each stage absorbs any floating-point remainder, so the draw
/// itself can never fail.
pub fn sample_outcome<R: Rng + ?Sized>(rates: &RateLine, rng: &mut R) -> PlateOutcome {
    let roll: f64 = rng.gen();
    if roll < rates.true_ba {
        sample_hit_type(rates, rng)
    } else if roll < rates.true_ba + rates.walk_rate {
        PlateOutcome::Walk
    } else {
        PlateOutcome::Out
    }
}

fn sample_hit_type<R: Rng + ?Sized>(rates: &RateLine, rng: &mut R) -> PlateOutcome {
    let roll: f64 = rng.gen();
    let mut edge = rates.single_rate;
    if roll < edge {
        return PlateOutcome::Single;
    }
    edge += rates.double_rate;
    if roll < edge {
        return PlateOutcome::Double;
    }
    edge += rates.triple_rate;
    if roll < edge {
        return PlateOutcome::Triple;
    }
    PlateOutcome::HomeRun
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn mixed_rates() -> RateLine {
        RateLine {
            true_ba: 0.300,
            walk_rate: 0.100,
            single_rate: 0.600,
            double_rate: 0.250,
            triple_rate: 0.050,
            homer_rate: 0.100,
        }
    }

    fn draw_many(rates: &RateLine, n: u64, seed: u64) -> HashMap<PlateOutcome, u64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut counts = HashMap::new();
        for _ in 0..n {
            *counts.entry(sample_outcome(rates, &mut rng)).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn certain_hitter_always_hits() {
        let rates = RateLine {
            true_ba: 1.0,
            walk_rate: 0.0,
            single_rate: 0.0,
            double_rate: 0.0,
            triple_rate: 0.0,
            homer_rate: 1.0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            assert_eq!(sample_outcome(&rates, &mut rng), PlateOutcome::HomeRun);
        }
    }

    #[test]
    fn hopeless_hitter_never_reaches_base() {
        let rates = RateLine {
            true_ba: 0.0,
            walk_rate: 0.0,
            single_rate: 1.0,
            double_rate: 0.0,
            triple_rate: 0.0,
            homer_rate: 0.0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..200 {
            assert_eq!(sample_outcome(&rates, &mut rng), PlateOutcome::Out);
        }
    }

    #[test]
    fn empirical_frequencies_converge_to_the_rates() {
        let rates = mixed_rates();
        let n = 200_000u64;
        let counts = draw_many(&rates, n, 42);

        let freq = |outcome: PlateOutcome| {
            *counts.get(&outcome).unwrap_or(&0) as f64 / n as f64
        };

        // Top-level marginals.
        let hit_freq: f64 = [
            PlateOutcome::Single,
            PlateOutcome::Double,
            PlateOutcome::Triple,
            PlateOutcome::HomeRun,
        ]
        .iter()
        .map(|&o| freq(o))
        .sum();
        assert!((hit_freq - 0.300).abs() < 0.005, "hit rate {}", hit_freq);
        assert!((freq(PlateOutcome::Walk) - 0.100).abs() < 0.005);
        assert!((freq(PlateOutcome::Out) - 0.600).abs() < 0.005);

        // Unconditional hit-type marginals are the product of the stages.
        assert!((freq(PlateOutcome::Single) - 0.300 * 0.600).abs() < 0.005);
        assert!((freq(PlateOutcome::Double) - 0.300 * 0.250).abs() < 0.005);
        assert!((freq(PlateOutcome::Triple) - 0.300 * 0.050).abs() < 0.004);
        assert!((freq(PlateOutcome::HomeRun) - 0.300 * 0.100).abs() < 0.004);
    }

    #[test]
    fn same_seed_same_stream() {
        let rates = mixed_rates();
        let a = draw_many(&rates, 5_000, 99);
        let b = draw_many(&rates, 5_000, 99);
        assert_eq!(a, b);
    }

    #[test]
    fn walk_only_batter_walks_or_outs() {
        let rates = RateLine {
            true_ba: 0.0,
            walk_rate: 0.5,
            single_rate: 1.0,
            double_rate: 0.0,
            triple_rate: 0.0,
            homer_rate: 0.0,
        };
        let counts = draw_many(&rates, 10_000, 7);
        assert!(counts.keys().all(|o| matches!(
            o,
            PlateOutcome::Walk | PlateOutcome::Out
        )));
        let walk_share = *counts.get(&PlateOutcome::Walk).unwrap_or(&0) as f64 / 10_000.0;
        assert!((walk_share - 0.5).abs() < 0.02);
    }
}

//! Local synthetic fallback
//!
//! Placeholder distribution used when every configured source fails. Results
//! are always tagged `local_fallback` and must never be presented as a real
//! measurement.

use crate::types::{EmotionCategory, EmotionDistribution};
use rand::Rng;

/// Uniform sampling range per category, before normalization
pub const FALLBACK_RANGES: [(EmotionCategory, f64, f64); 7] = [
    (EmotionCategory::Happy, 0.10, 0.40),
    (EmotionCategory::Sad, 0.05, 0.25),
    (EmotionCategory::Angry, 0.02, 0.17),
    (EmotionCategory::Fear, 0.01, 0.11),
    (EmotionCategory::Surprise, 0.01, 0.11),
    (EmotionCategory::Disgust, 0.01, 0.06),
    (EmotionCategory::Neutral, 0.40, 0.80),
];

/// Generator for the placeholder distribution
pub struct SyntheticFallback;

impl SyntheticFallback {
    /// Draw each category from its range, then scale to sum to 1
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> EmotionDistribution {
        let mut values = [0.0_f64; 7];
        for (category, low, high) in FALLBACK_RANGES {
            values[category.index()] = rng.gen_range(low..=high);
        }

        let total: f64 = values.iter().sum();
        for value in values.iter_mut() {
            *value /= total;
        }

        EmotionDistribution::from_normalized(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_distribution_sums_to_one() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let dist = SyntheticFallback::generate(&mut rng);
            assert!((dist.total() - 1.0).abs() < 1e-9);
            assert!(dist.iter().all(|(_, share)| share > 0.0));
        }
    }

    #[test]
    fn test_neutral_leads_on_average() {
        let mut rng = StdRng::seed_from_u64(42);
        let runs = 200;
        let neutral_mean: f64 = (0..runs)
            .map(|_| SyntheticFallback::generate(&mut rng).get(EmotionCategory::Neutral))
            .sum::<f64>()
            / runs as f64;
        let disgust_mean: f64 = (0..runs)
            .map(|_| SyntheticFallback::generate(&mut rng).get(EmotionCategory::Disgust))
            .sum::<f64>()
            / runs as f64;

        assert!(neutral_mean > 0.3);
        assert!(disgust_mean < 0.1);
    }

    #[test]
    fn test_same_seed_same_distribution() {
        let a = SyntheticFallback::generate(&mut StdRng::seed_from_u64(3));
        let b = SyntheticFallback::generate(&mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}

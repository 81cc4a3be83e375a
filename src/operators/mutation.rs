//! Mutation operators
//!
//! This module provides the bit-flip mutation operator for binary genomes.

use rand::Rng;

use crate::error::OperatorError;
use crate::genome::traits::BinaryGenome;
use crate::operators::traits::MutationOperator;

/// Bit-flip mutation for binary genomes
///
/// Each bit is independently flipped with `flip_probability`.
#[derive(Clone, Debug)]
pub struct BitFlipMutation {
    /// Per-bit flip probability
    pub flip_probability: f64,
}

impl BitFlipMutation {
    /// Create a bit-flip mutation with the given per-bit probability
    pub fn new(flip_probability: f64) -> Result<Self, OperatorError> {
        if !(0.0..=1.0).contains(&flip_probability) {
            return Err(OperatorError::InvalidConfiguration(format!(
                "flip probability must be in [0, 1], got {flip_probability}"
            )));
        }
        Ok(Self { flip_probability })
    }
}

impl Default for BitFlipMutation {
    fn default() -> Self {
        Self {
            flip_probability: 0.05,
        }
    }
}

impl<G: BinaryGenome> MutationOperator<G> for BitFlipMutation {
    fn mutate<R: Rng>(&self, genome: &mut G, rng: &mut R) {
        for bit in genome.bits_mut() {
            if rng.gen::<f64>() < self.flip_probability {
                *bit = !*bit;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::bit_string::BitString;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_invalid_probability() {
        assert!(BitFlipMutation::new(2.0).is_err());
        assert!(BitFlipMutation::new(f64::NAN).is_err());
    }

    #[test]
    fn test_zero_probability_is_identity() {
        let mut rng = StdRng::seed_from_u64(4);
        let original = BitString::from([true, false, true, false]);
        let mut genome = original.clone();
        BitFlipMutation::new(0.0).unwrap().mutate(&mut genome, &mut rng);
        assert_eq!(genome, original);
    }

    #[test]
    fn test_full_probability_inverts() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut genome = BitString::from([true, false, true, false]);
        BitFlipMutation::new(1.0).unwrap().mutate(&mut genome, &mut rng);
        assert_eq!(genome, BitString::from([false, true, false, true]));
    }

    #[test]
    fn test_flip_rate() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut genome = BitString::zeros(10_000);
        BitFlipMutation::new(0.05).unwrap().mutate(&mut genome, &mut rng);
        let flipped = genome.count_ones();
        assert!((350..650).contains(&flipped), "flipped {flipped}");
    }
}

//! Crossover operators
//!
//! This module provides the uniform crossover operator for binary genomes.

use rand::Rng;

use crate::error::{OperatorError, OperatorResult};
use crate::genome::traits::BinaryGenome;
use crate::operators::traits::CrossoverOperator;

/// Uniform crossover for bit strings
///
/// Each position is independently swapped between the two parents with
/// probability `swap_probability`.
#[derive(Clone, Debug)]
pub struct UniformCrossover {
    /// Per-position swap probability
    pub swap_probability: f64,
}

impl UniformCrossover {
    /// Create a uniform crossover with the given per-position swap probability
    pub fn new(swap_probability: f64) -> Result<Self, OperatorError> {
        if !(0.0..=1.0).contains(&swap_probability) {
            return Err(OperatorError::InvalidConfiguration(format!(
                "swap probability must be in [0, 1], got {swap_probability}"
            )));
        }
        Ok(Self { swap_probability })
    }
}

impl Default for UniformCrossover {
    fn default() -> Self {
        Self {
            swap_probability: 0.1,
        }
    }
}

impl<G: BinaryGenome> CrossoverOperator<G> for UniformCrossover {
    fn crossover<R: Rng>(&self, parent1: &G, parent2: &G, rng: &mut R) -> OperatorResult<(G, G)> {
        if parent1.dimension() != parent2.dimension() {
            return OperatorResult::Failed(OperatorError::CrossoverFailed(format!(
                "parent lengths differ: {} vs {}",
                parent1.dimension(),
                parent2.dimension()
            )));
        }

        let mut child1_bits = parent1.bits().to_vec();
        let mut child2_bits = parent2.bits().to_vec();
        for i in 0..child1_bits.len() {
            if rng.gen::<f64>() < self.swap_probability {
                std::mem::swap(&mut child1_bits[i], &mut child2_bits[i]);
            }
        }

        match (G::from_bits(child1_bits), G::from_bits(child2_bits)) {
            (Ok(child1), Ok(child2)) => OperatorResult::Success((child1, child2)),
            (Err(e), _) | (_, Err(e)) => {
                OperatorResult::Failed(OperatorError::CrossoverFailed(e.to_string()))
            }
        }
    }
}

//! Selection operators
//!
//! This module provides the tournament selection operator.

use rand::Rng;

use crate::error::OperatorError;
use crate::genome::traits::EvolutionaryGenome;
use crate::operators::traits::SelectionOperator;

/// Tournament selection operator
///
/// Draws `tournament_size` aspirants uniformly with replacement and keeps
/// the fittest. Ties go to the aspirant drawn first.
#[derive(Clone, Debug)]
pub struct TournamentSelection {
    /// Tournament size (number of individuals competing)
    pub tournament_size: usize,
}

impl TournamentSelection {
    /// Create a new tournament selection with the given size
    pub fn new(tournament_size: usize) -> Result<Self, OperatorError> {
        if tournament_size == 0 {
            return Err(OperatorError::InvalidConfiguration(
                "tournament size must be at least 1".to_string(),
            ));
        }
        Ok(Self { tournament_size })
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self { tournament_size: 3 }
    }
}

impl<G: EvolutionaryGenome> SelectionOperator<G> for TournamentSelection {
    fn select<R: Rng>(&self, population: &[(G, f64)], rng: &mut R) -> usize {
        assert!(!population.is_empty(), "Population cannot be empty");

        let mut best = rng.gen_range(0..population.len());
        for _ in 1..self.tournament_size {
            let aspirant = rng.gen_range(0..population.len());
            if population[aspirant].1 > population[best].1 {
                best = aspirant;
            }
        }
        best
    }
}

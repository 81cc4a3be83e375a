//! Hall of fame
//!
//! Keeps the best individuals ever seen during a run, independent of whether
//! they survive in the current population.

use crate::error::EvolutionError;
use crate::fitness::traits::{FitnessValue, SelectionFitness};
use crate::genome::traits::EvolutionaryGenome;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Best-ever individuals, sorted best first
///
/// An individual enters when the hall is not full or when it is strictly
/// better than the current worst entry. Genomes already present are never
/// inserted twice. Entries with equal fitness keep their arrival order.
#[derive(Clone, Debug)]
pub struct HallOfFame<G, F = SelectionFitness>
where
    G: EvolutionaryGenome + PartialEq,
    F: FitnessValue,
{
    capacity: usize,
    items: Vec<Individual<G, F>>,
}

impl<G, F> HallOfFame<G, F>
where
    G: EvolutionaryGenome + PartialEq,
    F: FitnessValue,
{
    /// Create an empty hall of fame holding up to `capacity` individuals
    pub fn new(capacity: usize) -> Result<Self, EvolutionError> {
        if capacity == 0 {
            return Err(EvolutionError::Configuration(
                "hall of fame capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            capacity,
            items: Vec::with_capacity(capacity),
        })
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The best individual ever seen
    pub fn best(&self) -> Option<&Individual<G, F>> {
        self.items.first()
    }

    /// All entries, best first
    pub fn items(&self) -> &[Individual<G, F>] {
        &self.items
    }

    /// Offer every evaluated individual of a population
    ///
    /// Unevaluated individuals are ignored. Returns whether the hall changed.
    pub fn update(&mut self, population: &Population<G, F>) -> bool {
        let mut changed = false;
        for individual in population.iter().filter(|i| i.is_evaluated()) {
            changed |= self.offer(individual);
        }
        changed
    }

    fn offer(&mut self, candidate: &Individual<G, F>) -> bool {
        let admissible = match self.items.last() {
            Some(worst) => self.items.len() < self.capacity || candidate.is_better_than(worst),
            None => true,
        };
        if !admissible || self.items.iter().any(|h| h.genome == candidate.genome) {
            return false;
        }

        if self.items.len() >= self.capacity {
            self.items.pop();
        }
        let position = self
            .items
            .iter()
            .position(|h| candidate.is_better_than(h))
            .unwrap_or(self.items.len());
        self.items.insert(position, candidate.clone());
        true
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::bit_string::BitString;

    fn individual(bits: [bool; 3], fitness: f64) -> Individual<BitString, f64> {
        Individual::with_fitness(BitString::from(bits), fitness)
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            HallOfFame::<BitString, f64>::new(0),
            Err(EvolutionError::Configuration(_))
        ));
    }

    #[test]
    fn test_keeps_single_best() {
        let mut hof: HallOfFame<BitString, f64> = HallOfFame::new(1).unwrap();
        let pop = Population::from_individuals(vec![
            individual([true, false, false], 1.0),
            individual([false, true, false], 3.0),
            individual([false, false, true], 2.0),
        ]);
        assert!(hof.update(&pop));
        assert_eq!(hof.len(), 1);
        assert_eq!(hof.best().unwrap().fitness_f64(), Some(3.0));
    }

    #[test]
    fn test_never_worsens() {
        let mut hof: HallOfFame<BitString, f64> = HallOfFame::new(1).unwrap();
        hof.update(&Population::from_individuals(vec![individual(
            [true, true, false],
            5.0,
        )]));

        let worse = Population::from_individuals(vec![
            individual([true, false, false], 4.0),
            individual([false, false, true], 5.0),
        ]);
        assert!(!hof.update(&worse));
        assert_eq!(hof.best().unwrap().genome, BitString::from([true, true, false]));
    }

    #[test]
    fn test_duplicate_genome_not_inserted() {
        let mut hof: HallOfFame<BitString, f64> = HallOfFame::new(3).unwrap();
        let pop = Population::from_individuals(vec![
            individual([true, false, false], 1.0),
            individual([true, false, false], 1.0),
            individual([false, true, false], 2.0),
        ]);
        hof.update(&pop);
        assert_eq!(hof.len(), 2);
        let fitnesses: Vec<_> = hof.items().iter().map(|i| i.fitness_f64()).collect();
        assert_eq!(fitnesses, vec![Some(2.0), Some(1.0)]);
    }

    #[test]
    fn test_sorted_and_bounded() {
        let mut hof: HallOfFame<BitString, f64> = HallOfFame::new(2).unwrap();
        let pop = Population::from_individuals(vec![
            individual([true, false, false], 1.0),
            individual([false, true, false], 3.0),
            individual([false, false, true], 2.0),
            individual([true, true, true], 0.5),
        ]);
        hof.update(&pop);
        let fitnesses: Vec<_> = hof.items().iter().map(|i| i.fitness_f64()).collect();
        assert_eq!(fitnesses, vec![Some(3.0), Some(2.0)]);
    }

    #[test]
    fn test_ignores_unevaluated() {
        let mut hof: HallOfFame<BitString, f64> = HallOfFame::new(1).unwrap();
        let pop = Population::from_individuals(vec![Individual::new(BitString::ones(3))]);
        assert!(!hof.update(&pop));
        assert!(hof.is_empty());
    }
}

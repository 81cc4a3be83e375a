//! Population type
//!
//! This module provides the Population container type.

use crate::fitness::traits::{Fitness, FitnessValue, FitnessWeights, SelectionFitness};
use crate::genome::traits::EvolutionaryGenome;
use crate::parallel::ParallelMap;
use crate::population::individual::Individual;

/// A population of individuals
#[derive(Clone, Debug)]
pub struct Population<G, F = SelectionFitness>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    /// The individuals in this population
    individuals: Vec<Individual<G, F>>,
    /// Current generation number
    generation: usize,
}

impl<G, F> Population<G, F>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    /// Create an empty population
    pub fn new() -> Self {
        Self {
            individuals: Vec::new(),
            generation: 0,
        }
    }

    /// Create a population with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            individuals: Vec::with_capacity(capacity),
            generation: 0,
        }
    }

    /// Create a population from a vector of individuals
    pub fn from_individuals(individuals: Vec<Individual<G, F>>) -> Self {
        Self {
            individuals,
            generation: 0,
        }
    }

    /// Get the current generation
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Set the generation number
    pub fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Get an individual by index
    pub fn get(&self, index: usize) -> Option<&Individual<G, F>> {
        self.individuals.get(index)
    }

    /// Add an individual to the population
    pub fn push(&mut self, individual: Individual<G, F>) {
        self.individuals.push(individual);
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> impl Iterator<Item = &Individual<G, F>> {
        self.individuals.iter()
    }

    /// Get a mutable iterator over the individuals
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Individual<G, F>> {
        self.individuals.iter_mut()
    }

    /// Get the underlying individuals
    pub fn individuals(&self) -> &[Individual<G, F>] {
        &self.individuals
    }

    /// Take the individuals out of this population
    pub fn into_individuals(self) -> Vec<Individual<G, F>> {
        self.individuals
    }

    /// Get the best individual (by fitness)
    ///
    /// On ties the earliest individual wins.
    pub fn best(&self) -> Option<&Individual<G, F>> {
        let mut best: Option<&Individual<G, F>> = None;
        for individual in self.individuals.iter().filter(|i| i.is_evaluated()) {
            match best {
                Some(current) if !individual.is_better_than(current) => {}
                _ => best = Some(individual),
            }
        }
        best
    }

    /// Sort the population by fitness (best first, unevaluated last)
    pub fn sort_by_fitness(&mut self) {
        self.individuals.sort_by(|a, b| {
            let fa = a.fitness_f64().unwrap_or(f64::NEG_INFINITY);
            let fb = b.fitness_f64().unwrap_or(f64::NEG_INFINITY);
            fb.partial_cmp(&fa).unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// Check if all individuals have been evaluated
    pub fn all_evaluated(&self) -> bool {
        self.individuals.iter().all(|i| i.is_evaluated())
    }

    /// Count the number of evaluated individuals
    pub fn count_evaluated(&self) -> usize {
        self.individuals.iter().filter(|i| i.is_evaluated()).count()
    }

    /// Get genome-fitness pairs as owned tuples for selection
    pub fn as_fitness_pairs(&self) -> Vec<(G, f64)> {
        self.individuals
            .iter()
            .filter_map(|i| i.fitness_f64().map(|f| (i.genome.clone(), f)))
            .collect()
    }

    /// Mean pairwise genome distance
    pub fn diversity(&self) -> f64 {
        let n = self.len();
        if n < 2 {
            return 0.0;
        }

        let mut total_distance = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                total_distance += self.individuals[i]
                    .genome
                    .distance(&self.individuals[j].genome);
            }
        }
        total_distance / (n * (n - 1) / 2) as f64
    }
}

impl<G> Population<G, SelectionFitness>
where
    G: EvolutionaryGenome,
{
    /// Evaluate every individual without a valid fitness
    ///
    /// Evaluations are dispatched through `executor`; results are assigned
    /// back to the individuals they came from. Returns the number of
    /// evaluations performed.
    pub fn evaluate_invalid<Fit, M>(
        &mut self,
        fitness: &Fit,
        executor: &M,
        weights: &FitnessWeights,
    ) -> usize
    where
        Fit: Fitness<Genome = G>,
        M: ParallelMap,
    {
        let pending: Vec<usize> = self
            .individuals
            .iter()
            .enumerate()
            .filter(|(_, i)| !i.is_evaluated())
            .map(|(idx, _)| idx)
            .collect();
        if pending.is_empty() {
            return 0;
        }

        let genomes: Vec<&G> = pending
            .iter()
            .map(|&idx| &self.individuals[idx].genome)
            .collect();
        let objectives = executor.map(&genomes, |genome| fitness.evaluate(genome));

        for (idx, objectives) in pending.iter().zip(objectives) {
            self.individuals[*idx].set_fitness(SelectionFitness::new(objectives, weights));
        }
        pending.len()
    }
}

impl<G, F> Default for Population<G, F>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<G, F> std::ops::Index<usize> for Population<G, F>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    type Output = Individual<G, F>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}

impl<G, F> Extend<Individual<G, F>> for Population<G, F>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    fn extend<I: IntoIterator<Item = Individual<G, F>>>(&mut self, iter: I) {
        self.individuals.extend(iter);
    }
}

impl<G, F> IntoIterator for Population<G, F>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    type Item = Individual<G, F>;
    type IntoIter = std::vec::IntoIter<Individual<G, F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.into_iter()
    }
}

impl<G, F> FromIterator<Individual<G, F>> for Population<G, F>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    fn from_iter<I: IntoIterator<Item = Individual<G, F>>>(iter: I) -> Self {
        Self::from_individuals(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::traits::Objectives;
    use crate::genome::bit_string::BitString;
    use crate::genome::traits::BinaryGenome;
    use crate::parallel::SequentialMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountOnes {
        calls: AtomicUsize,
    }

    impl Fitness for CountOnes {
        type Genome = BitString;

        fn evaluate(&self, genome: &BitString) -> Objectives {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let ones = genome.count_ones();
            Objectives::new(ones as f64 / 10.0, ones, 0.0)
        }
    }

    fn create_test_population() -> Population<BitString, f64> {
        let individuals = vec![
            Individual::with_fitness(BitString::from([false, false]), 10.0),
            Individual::with_fitness(BitString::from([true, false]), 50.0),
            Individual::with_fitness(BitString::from([false, true]), 30.0),
            Individual::with_fitness(BitString::from([true, true]), 50.0),
        ];
        Population::from_individuals(individuals)
    }

    #[test]
    fn test_population_new() {
        let pop: Population<BitString> = Population::new();
        assert!(pop.is_empty());
        assert_eq!(pop.generation(), 0);
    }

    #[test]
    fn test_population_best_keeps_first_on_ties() {
        let pop = create_test_population();
        let best = pop.best().unwrap();
        assert_eq!(best.fitness_f64(), Some(50.0));
        assert_eq!(best.genome, BitString::from([true, false]));
    }

    #[test]
    fn test_population_sort_by_fitness() {
        let mut pop = create_test_population();
        pop.push(Individual::new(BitString::zeros(2)));
        pop.sort_by_fitness();

        let fitnesses: Vec<Option<f64>> = pop.iter().map(|i| i.fitness_f64()).collect();
        assert_eq!(
            fitnesses,
            vec![Some(50.0), Some(50.0), Some(30.0), Some(10.0), None]
        );
    }

    #[test]
    fn test_population_as_fitness_pairs_skips_unevaluated() {
        let mut pop = create_test_population();
        pop.push(Individual::new(BitString::zeros(2)));
        let pairs = pop.as_fitness_pairs();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0].1, 10.0);
        assert_eq!(pop.count_evaluated(), 4);
        assert!(!pop.all_evaluated());
    }

    #[test]
    fn test_evaluate_invalid_only_touches_unevaluated() {
        let weights = FitnessWeights::default();
        let kept = SelectionFitness::new(Objectives::new(0.9, 1, 0.0), &weights);
        let mut pop: Population<BitString> = Population::from_individuals(vec![
            Individual::with_fitness(BitString::from([true, false, false]), kept),
            Individual::new(BitString::from([true, true, false])),
            Individual::new(BitString::from([true, true, true])),
        ]);

        let fitness = CountOnes {
            calls: AtomicUsize::new(0),
        };
        let nevals = pop.evaluate_invalid(&fitness, &SequentialMap, &weights);

        assert_eq!(nevals, 2);
        assert_eq!(fitness.calls.load(Ordering::SeqCst), 2);
        assert!(pop.all_evaluated());
        assert_eq!(pop[0].fitness, Some(kept));
        assert_eq!(pop[1].fitness.unwrap().n_features(), 2);
        assert_eq!(pop[2].fitness.unwrap().n_features(), 3);

        assert_eq!(pop.evaluate_invalid(&fitness, &SequentialMap, &weights), 0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_evaluate_invalid_parallel_matches_sequential() {
        use crate::parallel::RayonMap;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(7);
        let weights = FitnessWeights::default();
        let genomes: Vec<BitString> = (0..64)
            .map(|i| BitString::random_with_ones(16, 1 + i % 15, &mut rng))
            .collect();

        let mut sequential: Population<BitString> =
            genomes.iter().cloned().map(Individual::new).collect();
        let mut parallel = sequential.clone();

        let fitness = CountOnes {
            calls: AtomicUsize::new(0),
        };
        sequential.evaluate_invalid(&fitness, &SequentialMap, &weights);
        parallel.evaluate_invalid(&fitness, &RayonMap::new(4).unwrap(), &weights);

        for (a, b) in sequential.iter().zip(parallel.iter()) {
            assert_eq!(a.fitness, b.fitness);
        }
    }

    #[test]
    fn test_population_diversity() {
        let pop: Population<BitString, f64> = Population::from_individuals(vec![
            Individual::new(BitString::from([false, false])),
            Individual::new(BitString::from([true, false])),
            Individual::new(BitString::from([true, true])),
        ]);
        // Hamming distances 1, 2, 1
        assert!((pop.diversity() - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_population_extend_and_collect() {
        let mut pop = create_test_population();
        pop.extend(vec![Individual::with_fitness(BitString::zeros(2), 1.0)]);
        assert_eq!(pop.len(), 5);

        let collected: Population<BitString, f64> = pop.into_iter().take(2).collect();
        assert_eq!(collected.len(), 2);
    }
}

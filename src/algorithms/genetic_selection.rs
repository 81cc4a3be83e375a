//! Genetic feature selection
//!
//! A generational GA over feature-mask chromosomes, optionally carrying
//! hyperparameter segments in front of the mask. Each generation selects
//! offspring by tournament, varies them, re-evaluates what changed and merges
//! the hall of fame back in before replacing the population.

use std::time::Instant;

use log::{debug, info};
use rand::Rng;

use crate::diagnostics::{GenerationRecord, Logbook, SearchResult, TimingStats};
use crate::error::{EvoResult, EvolutionError};
use crate::fitness::traits::{Fitness, FitnessWeights};
use crate::genome::bit_string::BitString;
use crate::genome::codec;
use crate::genome::hyperparams::HyperparameterSpec;
use crate::genome::layout::ChromosomeLayout;
use crate::operators::traits::{CrossoverOperator, MutationOperator, SelectionOperator};
use crate::operators::variation::Variation;
use crate::parallel::{ParallelMap, SequentialMap};
use crate::population::hall_of_fame::HallOfFame;
use crate::population::individual::Individual;
use crate::population::initializer::Initializer;
use crate::population::population::Population;
use crate::termination::{
    AnyOf, BestUnchanged, MaxGenerations, SearchState, TerminationCriterion,
};

/// Configuration for the genetic selection loop
#[derive(Clone, Debug)]
pub struct GeneticSelectionConfig {
    /// Population size
    pub population_size: usize,
    /// Probability that a pair of offspring is mated
    pub crossover_rate: f64,
    /// Probability that an offspring is mutated
    pub mutation_rate: f64,
    /// Generation budget after the initial generation
    pub max_generations: usize,
    /// Stop after this many generations without a new best chromosome
    pub n_gen_no_change: Option<usize>,
    /// Objective weights used for ranking
    pub weights: FitnessWeights,
    /// Log every generation record at info level
    pub verbose: bool,
}

impl Default for GeneticSelectionConfig {
    fn default() -> Self {
        Self {
            population_size: 300,
            crossover_rate: 0.5,
            mutation_rate: 0.2,
            max_generations: 40,
            n_gen_no_change: None,
            weights: FitnessWeights::default(),
            verbose: false,
        }
    }
}

/// Builder for GeneticSelection
pub struct GeneticSelectionBuilder<S, C, M, Fit, P> {
    config: GeneticSelectionConfig,
    initializer: Option<Initializer>,
    hyperparameters: Option<HyperparameterSpec>,
    hall_of_fame: Option<HallOfFame<BitString>>,
    selection: Option<S>,
    crossover: Option<C>,
    mutation: Option<M>,
    fitness: Option<Fit>,
    executor: P,
}

impl GeneticSelectionBuilder<(), (), (), (), SequentialMap> {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: GeneticSelectionConfig::default(),
            initializer: None,
            hyperparameters: None,
            hall_of_fame: None,
            selection: None,
            crossover: None,
            mutation: None,
            fitness: None,
            executor: SequentialMap,
        }
    }
}

impl Default for GeneticSelectionBuilder<(), (), (), (), SequentialMap> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, C, M, Fit, P> GeneticSelectionBuilder<S, C, M, Fit, P> {
    /// Replace the whole configuration
    pub fn config(mut self, config: GeneticSelectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Set the pair crossover rate
    pub fn crossover_rate(mut self, rate: f64) -> Self {
        self.config.crossover_rate = rate;
        self
    }

    /// Set the individual mutation rate
    pub fn mutation_rate(mut self, rate: f64) -> Self {
        self.config.mutation_rate = rate;
        self
    }

    /// Set the generation budget
    pub fn max_generations(mut self, max: usize) -> Self {
        self.config.max_generations = max;
        self
    }

    /// Stop early after `generations` without a new best chromosome
    pub fn n_gen_no_change(mut self, generations: Option<usize>) -> Self {
        self.config.n_gen_no_change = generations;
        self
    }

    /// Set the objective weights
    pub fn weights(mut self, weights: FitnessWeights) -> Self {
        self.config.weights = weights;
        self
    }

    /// Log every generation record at info level
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Set the chromosome factory
    pub fn initializer(mut self, initializer: Initializer) -> Self {
        self.initializer = Some(initializer);
        self
    }

    /// Decode hyperparameter segments with this spec
    pub fn hyperparameters(mut self, spec: Option<HyperparameterSpec>) -> Self {
        self.hyperparameters = spec;
        self
    }

    /// Set the hall of fame
    pub fn hall_of_fame(mut self, hall_of_fame: HallOfFame<BitString>) -> Self {
        self.hall_of_fame = Some(hall_of_fame);
        self
    }

    /// Set the selection operator
    pub fn selection<NewS>(self, selection: NewS) -> GeneticSelectionBuilder<NewS, C, M, Fit, P>
    where
        NewS: SelectionOperator<BitString>,
    {
        GeneticSelectionBuilder {
            config: self.config,
            initializer: self.initializer,
            hyperparameters: self.hyperparameters,
            hall_of_fame: self.hall_of_fame,
            selection: Some(selection),
            crossover: self.crossover,
            mutation: self.mutation,
            fitness: self.fitness,
            executor: self.executor,
        }
    }

    /// Set the crossover operator
    pub fn crossover<NewC>(self, crossover: NewC) -> GeneticSelectionBuilder<S, NewC, M, Fit, P>
    where
        NewC: CrossoverOperator<BitString>,
    {
        GeneticSelectionBuilder {
            config: self.config,
            initializer: self.initializer,
            hyperparameters: self.hyperparameters,
            hall_of_fame: self.hall_of_fame,
            selection: self.selection,
            crossover: Some(crossover),
            mutation: self.mutation,
            fitness: self.fitness,
            executor: self.executor,
        }
    }

    /// Set the mutation operator
    pub fn mutation<NewM>(self, mutation: NewM) -> GeneticSelectionBuilder<S, C, NewM, Fit, P>
    where
        NewM: MutationOperator<BitString>,
    {
        GeneticSelectionBuilder {
            config: self.config,
            initializer: self.initializer,
            hyperparameters: self.hyperparameters,
            hall_of_fame: self.hall_of_fame,
            selection: self.selection,
            crossover: self.crossover,
            mutation: Some(mutation),
            fitness: self.fitness,
            executor: self.executor,
        }
    }

    /// Set the fitness function
    pub fn fitness<NewFit>(self, fitness: NewFit) -> GeneticSelectionBuilder<S, C, M, NewFit, P>
    where
        NewFit: Fitness<Genome = BitString>,
    {
        GeneticSelectionBuilder {
            config: self.config,
            initializer: self.initializer,
            hyperparameters: self.hyperparameters,
            hall_of_fame: self.hall_of_fame,
            selection: self.selection,
            crossover: self.crossover,
            mutation: self.mutation,
            fitness: Some(fitness),
            executor: self.executor,
        }
    }

    /// Set the evaluation executor
    pub fn executor<NewP>(self, executor: NewP) -> GeneticSelectionBuilder<S, C, M, Fit, NewP>
    where
        NewP: ParallelMap,
    {
        GeneticSelectionBuilder {
            config: self.config,
            initializer: self.initializer,
            hyperparameters: self.hyperparameters,
            hall_of_fame: self.hall_of_fame,
            selection: self.selection,
            crossover: self.crossover,
            mutation: self.mutation,
            fitness: self.fitness,
            executor,
        }
    }
}

impl<S, C, M, Fit, P> GeneticSelectionBuilder<S, C, M, Fit, P>
where
    S: SelectionOperator<BitString>,
    C: CrossoverOperator<BitString>,
    M: MutationOperator<BitString>,
    Fit: Fitness<Genome = BitString>,
    P: ParallelMap,
{
    /// Build the GeneticSelection instance
    pub fn build(self) -> Result<GeneticSelection<S, C, M, Fit, P>, EvolutionError> {
        let hall_of_fame = self.hall_of_fame.ok_or_else(|| {
            EvolutionError::Configuration("Hall of fame must be specified".to_string())
        })?;

        let initializer = self.initializer.ok_or_else(|| {
            EvolutionError::Configuration("Initializer must be specified".to_string())
        })?;

        let selection = self.selection.ok_or_else(|| {
            EvolutionError::Configuration("Selection operator must be specified".to_string())
        })?;

        let crossover = self.crossover.ok_or_else(|| {
            EvolutionError::Configuration("Crossover operator must be specified".to_string())
        })?;

        let mutation = self.mutation.ok_or_else(|| {
            EvolutionError::Configuration("Mutation operator must be specified".to_string())
        })?;

        let fitness = self.fitness.ok_or_else(|| {
            EvolutionError::Configuration("Fitness function must be specified".to_string())
        })?;

        if self.config.population_size <= hall_of_fame.capacity() {
            return Err(EvolutionError::Configuration(format!(
                "population size {} must exceed the hall of fame size {}",
                self.config.population_size,
                hall_of_fame.capacity()
            )));
        }

        if let Some(spec) = &self.hyperparameters {
            spec.validate()?;
        }

        let layout = initializer.layout().clone();
        let expected = ChromosomeLayout::new(layout.n_features(), self.hyperparameters.as_ref());
        if layout != expected {
            return Err(EvolutionError::Configuration(
                "initializer layout does not match the hyperparameter spec".to_string(),
            ));
        }

        let variation = Variation::new(
            crossover,
            mutation,
            self.config.crossover_rate,
            self.config.mutation_rate,
        )?;

        let mut criteria: Vec<Box<dyn TerminationCriterion>> =
            vec![Box::new(MaxGenerations::new(self.config.max_generations))];
        if let Some(patience) = self.config.n_gen_no_change {
            criteria.push(Box::new(BestUnchanged::new(patience)));
        }

        Ok(GeneticSelection {
            config: self.config,
            layout,
            initializer,
            hyperparameters: self.hyperparameters,
            hall_of_fame,
            selection,
            variation,
            fitness,
            executor: self.executor,
            termination: AnyOf::new(criteria),
        })
    }
}

/// Genetic feature selection
///
/// Owns the population and hall of fame for the duration of a run; nothing
/// carries over between runs.
pub struct GeneticSelection<S, C, M, Fit, P> {
    config: GeneticSelectionConfig,
    layout: ChromosomeLayout,
    initializer: Initializer,
    hyperparameters: Option<HyperparameterSpec>,
    hall_of_fame: HallOfFame<BitString>,
    selection: S,
    variation: Variation<C, M>,
    fitness: Fit,
    executor: P,
    termination: AnyOf,
}

impl GeneticSelection<(), (), (), (), SequentialMap> {
    /// Create a builder for GeneticSelection
    pub fn builder() -> GeneticSelectionBuilder<(), (), (), (), SequentialMap> {
        GeneticSelectionBuilder::new()
    }
}

impl<S, C, M, Fit, P> GeneticSelection<S, C, M, Fit, P>
where
    S: SelectionOperator<BitString>,
    C: CrossoverOperator<BitString>,
    M: MutationOperator<BitString>,
    Fit: Fitness<Genome = BitString>,
    P: ParallelMap,
{
    /// The configuration in use
    pub fn config(&self) -> &GeneticSelectionConfig {
        &self.config
    }

    /// The fitness function
    pub fn fitness(&self) -> &Fit {
        &self.fitness
    }

    fn log_record(&self, record: &GenerationRecord) {
        if self.config.verbose {
            info!("{}", record);
        } else {
            debug!("{}", record);
        }
    }

    /// Run the search
    pub fn run<R: Rng>(&self, rng: &mut R) -> EvoResult<SearchResult> {
        let start_time = Instant::now();
        let weights = &self.config.weights;
        let mut hall_of_fame = self.hall_of_fame.clone();

        info!(
            "Selecting features: {} candidates, population {}, up to {} generations",
            self.layout.n_features(),
            self.config.population_size,
            self.config.max_generations
        );
        if self.config.verbose {
            info!("{}", Logbook::HEADER);
        }

        // Initial generation
        let mut population = self
            .initializer
            .create_population(self.config.population_size, rng);
        let eval_start = Instant::now();
        let nevals = population.evaluate_invalid(&self.fitness, &self.executor, weights);
        let eval_time = eval_start.elapsed();
        hall_of_fame.update(&population);

        let mut logbook = Logbook::new();
        let record = GenerationRecord::from_population(&population, 0, nevals).with_timing(
            TimingStats::new()
                .with_evaluation(eval_time)
                .with_total(start_time.elapsed()),
        );
        self.log_record(&record);
        logbook.record(record);

        let mut state = SearchState {
            generation: 0,
            evaluations: nevals,
            stagnant_generations: 0,
            best_fitness: hall_of_fame
                .best()
                .and_then(|b| b.fitness_f64())
                .unwrap_or(f64::NEG_INFINITY),
        };

        let termination_reason = loop {
            if let Some(criterion) = self.termination.triggered(&state) {
                break criterion.reason();
            }

            let gen_start = Instant::now();
            let generation = state.generation + 1;

            // Every individual is evaluated here, so pool indices are
            // population indices.
            let pool = population.as_fitness_pairs();
            if pool.is_empty() {
                return Err(EvolutionError::EmptyPopulation);
            }
            let n_offspring = population.len().saturating_sub(hall_of_fame.len());
            let mut offspring: Vec<Individual<BitString>> = self
                .selection
                .select_many(&pool, n_offspring, rng)
                .into_iter()
                .map(|idx| population[idx].clone())
                .collect();

            let mut genomes: Vec<BitString> =
                offspring.iter().map(|i| i.genome.clone()).collect();
            let touched = self
                .variation
                .vary_segmented(&mut genomes, &self.layout, rng)?;
            for ((individual, genome), touched) in offspring.iter_mut().zip(genomes).zip(touched) {
                if touched {
                    individual.replace_genome(genome);
                    individual.birth_generation = generation;
                }
            }
            let variation_time = gen_start.elapsed();

            let mut next = Population::from_individuals(offspring);
            let eval_start = Instant::now();
            let nevals = next.evaluate_invalid(&self.fitness, &self.executor, weights);
            let eval_time = eval_start.elapsed();

            next.extend(hall_of_fame.items().iter().cloned());
            let previous_best = hall_of_fame.best().map(|b| b.genome.clone());
            hall_of_fame.update(&next);
            next.set_generation(generation);
            population = next;

            let record = GenerationRecord::from_population(&population, generation, nevals)
                .with_timing(
                    TimingStats::new()
                        .with_variation(variation_time)
                        .with_evaluation(eval_time)
                        .with_total(gen_start.elapsed()),
                );
            self.log_record(&record);
            logbook.record(record);

            let best = hall_of_fame.best();
            let unchanged = best.map(|b| &b.genome) == previous_best.as_ref();
            state.stagnant_generations = if unchanged {
                state.stagnant_generations + 1
            } else {
                0
            };
            state.generation = generation;
            state.evaluations += nevals;
            state.best_fitness = best
                .and_then(|b| b.fitness_f64())
                .unwrap_or(f64::NEG_INFINITY);
        };

        let best = hall_of_fame.best().ok_or(EvolutionError::EmptyPopulation)?;
        let best_fitness = best.fitness.ok_or(EvolutionError::EmptyPopulation)?;
        let candidate = codec::decode(&best.genome, self.hyperparameters.as_ref())?;

        let result = SearchResult {
            best_chromosome: best.genome.clone(),
            best_fitness,
            candidate,
            generations: state.generation,
            evaluations: state.evaluations,
            logbook,
            cache_stats: self.fitness.cache_stats(),
            termination_reason: Some(termination_reason.to_string()),
            total_runtime_ms: start_time.elapsed().as_secs_f64() * 1000.0,
        };
        info!(
            "Search finished after {} generations ({}): score {:.6} with {} features",
            result.generations,
            termination_reason,
            result.best_fitness.score(),
            result.n_selected()
        );
        Ok(result)
    }
}

//! Search configuration
//!
//! The serializable set of options recognized by a feature-selection run.
//! Every field has a default, so a partial JSON document is a valid
//! configuration.

use serde::{Deserialize, Serialize};

use crate::algorithms::genetic_selection::GeneticSelectionConfig;
use crate::error::{EvoResult, EvolutionError};
use crate::fitness::cache::CacheKeyMode;
use crate::fitness::collaborators::CvSettings;
use crate::fitness::traits::FitnessWeights;
use crate::genome::hyperparams::HyperparameterSpec;
use crate::parallel::{Executor, Parallelism};

/// Options for a feature-selection run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Population size
    pub n_population: usize,
    /// Probability that a pair of offspring is mated
    pub crossover_proba: f64,
    /// Probability that an offspring is mutated
    pub mutation_proba: f64,
    /// Generation budget after the initial generation
    pub n_generations: usize,
    /// Per-position swap probability of uniform crossover
    pub crossover_independent_proba: f64,
    /// Per-bit flip probability of mutation
    pub mutation_independent_proba: f64,
    /// Aspirants per tournament
    pub tournament_size: usize,
    /// Stop after this many generations without a new best chromosome
    pub n_gen_no_change: Option<usize>,
    /// Upper bound on selected features, `None` for all of them
    pub max_features: Option<usize>,
    /// Hyperparameters evolved alongside the feature mask
    pub hparams: Option<HyperparameterSpec>,
    /// Memoize cross-validation scores for the run
    pub caching: bool,
    /// What the cache is keyed on
    pub cache_key: CacheKeyMode,
    /// Evaluation workers: 1 sequential, `n > 1` that many, negative counts
    /// back from the number of CPUs
    pub n_jobs: i64,
    /// Log every generation record at info level
    pub verbose: bool,
    /// Objective weights used for ranking
    pub weights: FitnessWeights,
    /// Number of best-ever individuals kept and re-injected
    pub hall_of_fame_size: usize,
    /// Cross-validation settings passed to the scoring collaborator
    pub cv: CvSettings,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            n_population: 300,
            crossover_proba: 0.5,
            mutation_proba: 0.2,
            n_generations: 40,
            crossover_independent_proba: 0.1,
            mutation_independent_proba: 0.05,
            tournament_size: 3,
            n_gen_no_change: None,
            max_features: None,
            hparams: None,
            caching: false,
            cache_key: CacheKeyMode::default(),
            n_jobs: 1,
            verbose: false,
            weights: FitnessWeights::default(),
            hall_of_fame_size: 1,
            cv: CvSettings::default(),
        }
    }
}

fn check_probability(name: &str, value: f64) -> EvoResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EvolutionError::Configuration(format!(
            "'{name}' should be a probability in [0, 1], got {value}"
        )))
    }
}

impl SelectionConfig {
    /// Parse a JSON configuration
    pub fn from_json_str(json: &str) -> EvoResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| EvolutionError::Configuration(format!("invalid configuration: {e}")))
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> EvoResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| EvolutionError::Configuration(format!("unserializable configuration: {e}")))
    }

    /// Check the configuration against a dataset width
    ///
    /// Returns the resolved selected-feature bound.
    pub fn validate(&self, n_features: usize) -> EvoResult<usize> {
        if n_features == 0 {
            return Err(EvolutionError::Configuration(
                "the dataset has no features".to_string(),
            ));
        }

        let max_features = self.max_features.unwrap_or(n_features);
        if max_features < 1 || max_features > n_features {
            return Err(EvolutionError::Configuration(format!(
                "'max_features' should be between 1 and {} features. Got {} instead.",
                n_features, max_features
            )));
        }

        check_probability("crossover_proba", self.crossover_proba)?;
        check_probability("mutation_proba", self.mutation_proba)?;
        check_probability("crossover_independent_proba", self.crossover_independent_proba)?;
        check_probability("mutation_independent_proba", self.mutation_independent_proba)?;

        if self.tournament_size == 0 {
            return Err(EvolutionError::Configuration(
                "'tournament_size' should be at least 1".to_string(),
            ));
        }
        if self.hall_of_fame_size == 0 {
            return Err(EvolutionError::Configuration(
                "'hall_of_fame_size' should be at least 1".to_string(),
            ));
        }
        if self.n_population <= self.hall_of_fame_size {
            return Err(EvolutionError::Configuration(format!(
                "'n_population' should exceed the hall of fame size {}, got {}",
                self.hall_of_fame_size, self.n_population
            )));
        }

        let weights = [self.weights.score, self.weights.n_features, self.weights.dispersion];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(EvolutionError::Configuration(
                "objective weights should be finite".to_string(),
            ));
        }

        if let Some(spec) = &self.hparams {
            spec.validate()?;
        }
        Parallelism::from_n_jobs(self.n_jobs)?;

        Ok(max_features)
    }

    /// Resolved evaluation parallelism
    pub fn parallelism(&self) -> EvoResult<Parallelism> {
        Parallelism::from_n_jobs(self.n_jobs)
    }

    /// Build the evaluation executor
    pub fn executor(&self) -> EvoResult<Executor> {
        Executor::new(self.parallelism()?)
    }

    /// Loop settings derived from this configuration
    pub fn loop_config(&self) -> GeneticSelectionConfig {
        GeneticSelectionConfig {
            population_size: self.n_population,
            crossover_rate: self.crossover_proba,
            mutation_rate: self.mutation_proba,
            max_generations: self.n_generations,
            n_gen_no_change: self.n_gen_no_change,
            weights: self.weights,
            verbose: self.verbose,
        }
    }
}

//! Fitness traits
//!
//! This module defines the three-objective fitness used to rank candidates and
//! the evaluation trait the search loop drives.

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::fitness::cache::CacheStats;
use crate::genome::traits::EvolutionaryGenome;

/// Primary score given to infeasible candidates
pub const INFEASIBLE_SCORE: f64 = -10000.0;

/// Dispersion given to infeasible candidates
pub const INFEASIBLE_DISPERSION: f64 = 10000.0;

/// Trait bound for fitness values
///
/// Fitness values must be comparable and convertible to f64 for
/// selection. They must also be serializable for diagnostics.
pub trait FitnessValue:
    PartialOrd + Clone + Send + Sync + Debug + Serialize + DeserializeOwned + 'static
{
    /// Convert fitness to f64 for selection
    fn to_f64(&self) -> f64;

    /// Check if this fitness is better than another
    fn is_better_than(&self, other: &Self) -> bool;

    /// Check if this fitness is worse than another
    fn is_worse_than(&self, other: &Self) -> bool {
        other.is_better_than(self)
    }
}

impl FitnessValue for f64 {
    fn to_f64(&self) -> f64 {
        *self
    }

    fn is_better_than(&self, other: &Self) -> bool {
        self > other
    }
}

/// Raw objective values of one evaluation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Objectives {
    /// Mean cross-validated score (maximize)
    pub score: f64,
    /// Number of selected features (minimize)
    pub n_features: usize,
    /// Standard deviation of the fold scores (minimize)
    pub dispersion: f64,
}

impl Objectives {
    /// Create a new objective triple
    pub fn new(score: f64, n_features: usize, dispersion: f64) -> Self {
        Self {
            score,
            n_features,
            dispersion,
        }
    }

    /// The sentinel for a candidate selecting zero or too many features
    pub fn infeasible(n_features: usize) -> Self {
        Self::new(INFEASIBLE_SCORE, n_features, INFEASIBLE_DISPERSION)
    }

    /// Whether this is the infeasible sentinel
    pub fn is_infeasible(&self) -> bool {
        self.score == INFEASIBLE_SCORE && self.dispersion == INFEASIBLE_DISPERSION
    }

    /// The triple as floats, in objective order
    pub fn values(&self) -> [f64; 3] {
        [self.score, self.n_features as f64, self.dispersion]
    }
}

/// Objective weights used to rank candidates
///
/// Positive weights maximize, negative weights minimize. Ranking compares the
/// weighted sum of the objectives.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitnessWeights {
    /// Weight on the primary score
    pub score: f64,
    /// Weight on the selected-feature count
    pub n_features: f64,
    /// Weight on the score dispersion
    pub dispersion: f64,
}

impl FitnessWeights {
    /// Create custom weights
    pub fn new(score: f64, n_features: f64, dispersion: f64) -> Self {
        Self {
            score,
            n_features,
            dispersion,
        }
    }

    /// Weighted sum of an objective triple
    pub fn weigh(&self, objectives: &Objectives) -> f64 {
        self.score * objectives.score
            + self.n_features * objectives.n_features as f64
            + self.dispersion * objectives.dispersion
    }
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self::new(1.0, -0.1, -0.5)
    }
}

/// Weighted three-objective fitness of a feature-selection candidate
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionFitness {
    /// The raw objective values
    pub objectives: Objectives,
    /// Weighted sum used for ranking
    pub weighted: f64,
}

impl SelectionFitness {
    /// Attach weights to raw objectives
    pub fn new(objectives: Objectives, weights: &FitnessWeights) -> Self {
        Self {
            objectives,
            weighted: weights.weigh(&objectives),
        }
    }

    /// Primary score
    pub fn score(&self) -> f64 {
        self.objectives.score
    }

    /// Selected-feature count
    pub fn n_features(&self) -> usize {
        self.objectives.n_features
    }

    /// Score dispersion
    pub fn dispersion(&self) -> f64 {
        self.objectives.dispersion
    }
}

impl PartialOrd for SelectionFitness {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.weighted.partial_cmp(&other.weighted)
    }
}

impl FitnessValue for SelectionFitness {
    fn to_f64(&self) -> f64 {
        self.weighted
    }

    fn is_better_than(&self, other: &Self) -> bool {
        self.weighted > other.weighted
    }
}

/// Fitness evaluation trait
///
/// Implementations are called concurrently from the evaluation pool, so they
/// must be `Sync` and must not rely on call order.
pub trait Fitness: Send + Sync {
    /// The genome type being evaluated
    type Genome: EvolutionaryGenome;

    /// Evaluate one genome
    fn evaluate(&self, genome: &Self::Genome) -> Objectives;

    /// Score cache counters, if this fitness caches
    fn cache_stats(&self) -> Option<CacheStats> {
        None
    }
}

//! Diagnostics and statistics
//!
//! Per-generation statistics over the three objectives, the run logbook, and
//! the final search result.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::fitness::cache::CacheStats;
use crate::fitness::traits::SelectionFitness;
use crate::genome::bit_string::BitString;
use crate::genome::codec::Candidate;
use crate::genome::hyperparams::Hyperparameters;
use crate::genome::traits::EvolutionaryGenome;
use crate::population::population::Population;

/// Mean and population standard deviation, `None` for an empty slice
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

/// Timing statistics
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingStats {
    /// Time spent on fitness evaluation (ms)
    pub evaluation_ms: f64,
    /// Time spent on selection and variation (ms)
    pub variation_ms: f64,
    /// Total generation time (ms)
    pub total_ms: f64,
}

impl TimingStats {
    /// Create new timing stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Set evaluation time
    pub fn with_evaluation(mut self, duration: Duration) -> Self {
        self.evaluation_ms = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Set variation time
    pub fn with_variation(mut self, duration: Duration) -> Self {
        self.variation_ms = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Set total time
    pub fn with_total(mut self, duration: Duration) -> Self {
        self.total_ms = duration.as_secs_f64() * 1000.0;
        self
    }
}

/// Statistics for a single generation
///
/// Each statistic is a triple in objective order: score, feature count,
/// dispersion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Generation number (0 = initial population)
    pub generation: usize,
    /// Evaluations performed in this generation
    pub nevals: usize,
    /// Per-objective mean
    pub avg: [f64; 3],
    /// Per-objective population standard deviation
    pub std: [f64; 3],
    /// Per-objective minimum
    pub min: [f64; 3],
    /// Per-objective maximum
    pub max: [f64; 3],
    /// Timing information
    pub timing: TimingStats,
}

impl GenerationRecord {
    /// Compute statistics over the evaluated individuals of a population
    pub fn from_population<G>(
        population: &Population<G, SelectionFitness>,
        generation: usize,
        nevals: usize,
    ) -> Self
    where
        G: EvolutionaryGenome,
    {
        let values: Vec<[f64; 3]> = population
            .iter()
            .filter_map(|i| i.fitness.as_ref().map(|f| f.objectives.values()))
            .collect();

        let mut record = Self {
            generation,
            nevals,
            avg: [0.0; 3],
            std: [0.0; 3],
            min: [f64::NAN; 3],
            max: [f64::NAN; 3],
            timing: TimingStats::default(),
        };

        for objective in 0..3 {
            let column: Vec<f64> = values.iter().map(|v| v[objective]).collect();
            if let Some((mean, std)) = mean_std(&column) {
                record.avg[objective] = mean;
                record.std[objective] = std;
                record.min[objective] = column.iter().copied().fold(f64::INFINITY, f64::min);
                record.max[objective] = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            }
        }
        record
    }

    /// Set timing information
    pub fn with_timing(mut self, timing: TimingStats) -> Self {
        self.timing = timing;
        self
    }

    /// Best primary score in this generation
    pub fn max_score(&self) -> f64 {
        self.max[0]
    }
}

fn write_triple(f: &mut fmt::Formatter<'_>, triple: &[f64; 3]) -> fmt::Result {
    write!(f, "[{:>13.6} {:>13.6} {:>13.6}]", triple[0], triple[1], triple[2])
}

impl fmt::Display for GenerationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<5}{:<8}", self.generation, self.nevals)?;
        for triple in [&self.avg, &self.std, &self.min, &self.max] {
            write!(f, "\t")?;
            write_triple(f, triple)?;
        }
        Ok(())
    }
}

/// Per-generation records of one run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Logbook {
    records: Vec<GenerationRecord>,
}

impl Logbook {
    /// Column header matching the `Display` form of a record
    pub const HEADER: &'static str = "gen  nevals \tavg\tstd\tmin\tmax";

    /// Create an empty logbook
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a generation's record
    pub fn record(&mut self, record: GenerationRecord) {
        self.records.push(record);
    }

    /// Number of recorded generations (including generation 0)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in order
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    /// Most recent record
    pub fn last(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }

    /// Maximum primary score of each generation
    pub fn generation_scores(&self) -> Vec<f64> {
        self.records.iter().map(GenerationRecord::max_score).collect()
    }

    /// Total evaluations across all generations
    pub fn total_evaluations(&self) -> usize {
        self.records.iter().map(|r| r.nevals).sum()
    }
}

/// Result of a search run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResult {
    /// Best-ever chromosome (hall-of-fame head)
    pub best_chromosome: BitString,
    /// Its fitness
    pub best_fitness: SelectionFitness,
    /// Its decoded form
    pub candidate: Candidate,
    /// Generations completed after the initial one
    pub generations: usize,
    /// Total fitness evaluations requested by the loop
    pub evaluations: usize,
    /// Per-generation statistics
    pub logbook: Logbook,
    /// Score cache counters, when the fitness caches
    pub cache_stats: Option<CacheStats>,
    /// Why the loop stopped
    pub termination_reason: Option<String>,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
}

impl SearchResult {
    /// Feature selection mask of the best candidate
    pub fn support(&self) -> &[bool] {
        &self.candidate.support
    }

    /// Number of selected features of the best candidate
    pub fn n_selected(&self) -> usize {
        self.candidate.n_selected()
    }

    /// Hyperparameter values of the best candidate
    pub fn best_params(&self) -> &Hyperparameters {
        &self.candidate.params
    }

    /// Maximum primary score per generation
    pub fn generation_scores(&self) -> Vec<f64> {
        self.logbook.generation_scores()
    }

    /// Whether no feasible candidate was ever found
    pub fn is_infeasible(&self) -> bool {
        self.best_fitness.objectives.is_infeasible()
    }

    /// Get a summary of the run
    pub fn summary(&self) -> String {
        format!(
            "Search Summary:\n\
             - Generations: {}\n\
             - Evaluations: {}\n\
             - Best score: {:.6}\n\
             - Selected features: {}\n\
             - Runtime: {:.2}ms\n\
             - Termination: {}",
            self.generations,
            self.evaluations,
            self.best_fitness.score(),
            self.n_selected(),
            self.total_runtime_ms,
            self.termination_reason.as_deref().unwrap_or("unknown")
        )
    }
}

pub mod prelude {
    pub use super::{mean_std, GenerationRecord, Logbook, SearchResult, TimingStats};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::traits::{FitnessWeights, Objectives};
    use crate::population::individual::Individual;
    use approx::assert_relative_eq;

    fn fitness(score: f64, count: usize, dispersion: f64) -> SelectionFitness {
        SelectionFitness::new(
            Objectives::new(score, count, dispersion),
            &FitnessWeights::default(),
        )
    }

    fn test_population() -> Population<BitString, SelectionFitness> {
        Population::from_individuals(vec![
            Individual::with_fitness(BitString::from([true, false]), fitness(0.5, 1, 0.1)),
            Individual::with_fitness(BitString::from([true, true]), fitness(0.7, 2, 0.3)),
            Individual::new(BitString::from([false, true])),
        ])
    }

    #[test]
    fn test_mean_std() {
        let (mean, std) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(mean, 5.0);
        assert_eq!(std, 2.0);
        assert!(mean_std(&[]).is_none());
    }

    #[test]
    fn test_record_from_population() {
        let record = GenerationRecord::from_population(&test_population(), 3, 2);
        assert_eq!(record.generation, 3);
        assert_eq!(record.nevals, 2);
        assert_relative_eq!(record.avg[0], 0.6, epsilon = 1e-12);
        assert_relative_eq!(record.std[0], 0.1, epsilon = 1e-12);
        assert_eq!(record.min[1], 1.0);
        assert_eq!(record.max[1], 2.0);
        assert_eq!(record.max_score(), 0.7);
        assert_eq!(record.min[2], 0.1);
    }

    #[test]
    fn test_record_display() {
        let record = GenerationRecord::from_population(&test_population(), 0, 3);
        let line = record.to_string();
        assert!(line.starts_with("0    3"));
        assert_eq!(line.matches('[').count(), 4);
    }

    #[test]
    fn test_logbook_generation_scores() {
        let mut logbook = Logbook::new();
        let pop = test_population();
        logbook.record(GenerationRecord::from_population(&pop, 0, 3));
        logbook.record(GenerationRecord::from_population(&pop, 1, 2));
        assert_eq!(logbook.len(), 2);
        assert_eq!(logbook.generation_scores(), vec![0.7, 0.7]);
        assert_eq!(logbook.total_evaluations(), 5);
        assert_eq!(logbook.last().unwrap().generation, 1);
    }

    #[test]
    fn test_timing_stats() {
        let timing = TimingStats::new()
            .with_evaluation(Duration::from_millis(5))
            .with_total(Duration::from_millis(8));
        assert_relative_eq!(timing.evaluation_ms, 5.0, epsilon = 1e-9);
        assert_relative_eq!(timing.total_ms, 8.0, epsilon = 1e-9);
    }
}

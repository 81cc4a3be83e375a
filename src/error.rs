//! Error types for genetic-selection
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for genome operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenomeError {
    /// Invalid genome structure
    #[error("Invalid genome structure: {0}")]
    InvalidStructure(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A segment does not fit inside the chromosome
    #[error("Segment {start}..{end} out of range for chromosome of length {len}")]
    SegmentOutOfRange { start: usize, end: usize, len: usize },
}

/// Error type for operator failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// Crossover operation failed
    #[error("Crossover failed: {0}")]
    CrossoverFailed(String),

    /// Invalid operator configuration
    #[error("Invalid operator configuration: {0}")]
    InvalidConfiguration(String),
}

/// Error reported by the scoring collaborator or the model template.
///
/// These never escape a search run: the evaluator absorbs them into the
/// infeasible sentinel fitness.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    /// Cross-validation scoring failed
    #[error("Scoring failed: {0}")]
    Scoring(String),

    /// The model does not accept the named hyperparameter
    #[error("Unknown hyperparameter: {0}")]
    UnknownHyperparameter(String),

    /// The collaborator returned no fold scores
    #[error("Scoring collaborator returned no fold scores")]
    EmptyScores,

    /// A fold score was NaN or infinite
    #[error("Non-finite fold score: {0}")]
    NonFiniteScore(f64),
}

/// Top-level error type for evolution operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Genome error
    #[error("Genome error: {0}")]
    Genome(#[from] GenomeError),

    /// Operator error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;

/// Result of an operator application
#[derive(Debug, Clone)]
pub enum OperatorResult<G> {
    /// Operation succeeded
    Success(G),
    /// Operation failed unrecoverably
    Failed(OperatorError),
}

impl<G> OperatorResult<G> {
    /// Returns the genome if successful, None if failed
    pub fn genome(self) -> Option<G> {
        match self {
            Self::Success(g) => Some(g),
            Self::Failed(_) => None,
        }
    }

    /// Returns true if the operation was successful
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Convert into a `Result`
    pub fn into_result(self) -> Result<G, OperatorError> {
        match self {
            Self::Success(g) => Ok(g),
            Self::Failed(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genome_error_display() {
        let err = GenomeError::DimensionMismatch {
            expected: 10,
            actual: 5,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 10, got 5");

        let err = GenomeError::SegmentOutOfRange {
            start: 4,
            end: 8,
            len: 6,
        };
        assert_eq!(
            err.to_string(),
            "Segment 4..8 out of range for chromosome of length 6"
        );
    }

    #[test]
    fn test_evaluation_error_display() {
        let err = EvaluationError::UnknownHyperparameter("gamma".to_string());
        assert_eq!(err.to_string(), "Unknown hyperparameter: gamma");
    }

    #[test]
    fn test_evolution_error_from_genome_error() {
        let genome_err = GenomeError::InvalidStructure("bad shape".to_string());
        let evo_err: EvolutionError = genome_err.into();
        assert!(matches!(evo_err, EvolutionError::Genome(_)));
    }

    #[test]
    fn test_configuration_error_display() {
        let err = EvolutionError::Configuration("n_jobs == 0 has no meaning".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: n_jobs == 0 has no meaning"
        );
    }

    #[test]
    fn test_operator_result() {
        let ok: OperatorResult<i32> = OperatorResult::Success(42);
        assert!(ok.is_ok());
        assert_eq!(ok.genome(), Some(42));

        let failed: OperatorResult<i32> =
            OperatorResult::Failed(OperatorError::CrossoverFailed("test".to_string()));
        assert!(!failed.is_ok());
        assert!(failed.into_result().is_err());
    }
}

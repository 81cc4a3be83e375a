//! Termination criteria
//!
//! Criteria are checked at generation boundaries only, never while a
//! generation is being evaluated.

/// Search state for termination checking
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SearchState {
    /// Generations completed after the initial one
    pub generation: usize,
    /// Total fitness evaluations so far
    pub evaluations: usize,
    /// Consecutive generations whose best-ever chromosome did not change
    pub stagnant_generations: usize,
    /// Weighted fitness of the best-ever individual
    pub best_fitness: f64,
}

/// Termination criterion trait
pub trait TerminationCriterion: Send + Sync {
    /// Check if the search should stop
    fn should_terminate(&self, state: &SearchState) -> bool;

    /// Get a description of why termination occurred
    fn reason(&self) -> &'static str;
}

/// Terminate after a maximum number of generations
#[derive(Clone, Debug)]
pub struct MaxGenerations(pub usize);

impl MaxGenerations {
    /// Create a new max generations criterion
    pub fn new(max: usize) -> Self {
        Self(max)
    }
}

impl TerminationCriterion for MaxGenerations {
    fn should_terminate(&self, state: &SearchState) -> bool {
        state.generation >= self.0
    }

    fn reason(&self) -> &'static str {
        "Maximum generations reached"
    }
}

/// Terminate when the best-ever chromosome stays the same
///
/// Only counts generations after the initial one, so a limit of zero still
/// runs one generation.
#[derive(Clone, Debug)]
pub struct BestUnchanged(pub usize);

impl BestUnchanged {
    /// Create a stagnation criterion with the given patience
    pub fn new(generations: usize) -> Self {
        Self(generations)
    }
}

impl TerminationCriterion for BestUnchanged {
    fn should_terminate(&self, state: &SearchState) -> bool {
        state.generation > 0 && state.stagnant_generations >= self.0
    }

    fn reason(&self) -> &'static str {
        "Best individual unchanged"
    }
}

/// Combine criteria with OR logic (any one triggers termination)
pub struct AnyOf {
    criteria: Vec<Box<dyn TerminationCriterion>>,
}

impl AnyOf {
    /// Create a new AnyOf combinator
    pub fn new(criteria: Vec<Box<dyn TerminationCriterion>>) -> Self {
        Self { criteria }
    }

    /// The first criterion that fires, if any
    pub fn triggered(&self, state: &SearchState) -> Option<&dyn TerminationCriterion> {
        self.criteria
            .iter()
            .find(|c| c.should_terminate(state))
            .map(|c| c.as_ref())
    }
}

impl std::fmt::Debug for AnyOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reasons: Vec<_> = self.criteria.iter().map(|c| c.reason()).collect();
        f.debug_struct("AnyOf").field("criteria", &reasons).finish()
    }
}

impl TerminationCriterion for AnyOf {
    fn should_terminate(&self, state: &SearchState) -> bool {
        self.criteria.iter().any(|c| c.should_terminate(state))
    }

    fn reason(&self) -> &'static str {
        "One of multiple criteria met"
    }
}

pub mod prelude {
    pub use super::{AnyOf, BestUnchanged, MaxGenerations, SearchState, TerminationCriterion};
}

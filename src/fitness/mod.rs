//! Fitness evaluation
//!
//! This module provides the weighted three-objective fitness, the score cache,
//! the scoring collaborator interfaces and the cross-validated evaluator.

pub mod cache;
pub mod collaborators;
pub mod evaluator;
pub mod traits;

pub mod prelude {
    pub use super::cache::*;
    pub use super::collaborators::*;
    pub use super::evaluator::*;
    pub use super::traits::*;
}

//! Genetic operators
//!
//! This module provides selection, crossover, mutation and the variation
//! step that combines them.

pub mod crossover;
pub mod mutation;
pub mod selection;
pub mod traits;
pub mod variation;

pub mod prelude {
    pub use super::crossover::*;
    pub use super::mutation::*;
    pub use super::selection::*;
    pub use super::traits::*;
    pub use super::variation::*;
}

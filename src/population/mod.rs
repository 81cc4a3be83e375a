//! Population management
//!
//! This module provides the Individual and Population types, the hall of
//! fame and the random initializer.

pub mod hall_of_fame;
pub mod individual;
pub mod initializer;
#[allow(clippy::module_inception)]
pub mod population;

pub mod prelude {
    pub use super::hall_of_fame::*;
    pub use super::individual::*;
    pub use super::initializer::*;
    pub use super::population::*;
}

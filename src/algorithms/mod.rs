//! Search algorithms
//!
//! The genetic feature-selection loop and the one-call pipeline built on it.

pub mod genetic_selection;
pub mod selector;

pub mod prelude {
    pub use super::genetic_selection::*;
    pub use super::selector::*;
}

//! Genome abstractions and implementations
//!
//! This module provides the bit-string chromosome, its segment layout, the
//! hyperparameter search space, and the codec between chromosomes and
//! candidates.

pub mod bit_string;
pub mod codec;
pub mod hyperparams;
pub mod layout;
pub mod traits;

pub mod prelude {
    pub use super::bit_string::*;
    pub use super::codec::*;
    pub use super::hyperparams::*;
    pub use super::layout::*;
    pub use super::traits::*;
}

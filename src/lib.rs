//! # genetic-selection
//!
//! Genetic feature selection with optional hyperparameter search.
//!
//! A chromosome is a bit string: one bit per candidate feature, optionally
//! preceded by fixed-width hyperparameter segments. Each chromosome is scored
//! by cross-validating a model on the selected columns, and a tournament GA
//! with a hall of fame searches for the subset that scores best while using
//! few features and varying little across folds.
//!
//! ## Core Concepts
//!
//! - **Objectives**: every individual carries `(score, n_features, dispersion)`,
//!   ranked by a weighted sum (default weights `(1.0, -0.1, -0.5)`)
//! - **Infeasible sentinel**: empty or oversized subsets score
//!   `(-10000, n, 10000)` without being cross-validated
//! - **Collaborators**: the model and the cross-validation routine are
//!   supplied through the [`fitness::collaborators::Estimator`] and
//!   [`fitness::collaborators::CrossValidator`] traits
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use genetic_selection::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let config = SelectionConfig {
//!     max_features: Some(5),
//!     n_gen_no_change: Some(10),
//!     caching: true,
//!     ..SelectionConfig::default()
//! };
//!
//! let result = select_features(model, validator, &dataset, &config, &mut rng)?;
//! println!("selected {:?}", result.candidate.selected_indices());
//! ```

pub mod algorithms;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod parallel;
pub mod population;
pub mod termination;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::config::SelectionConfig;
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::parallel::*;
    pub use crate::population::prelude::*;
    pub use crate::termination::prelude::*;
}

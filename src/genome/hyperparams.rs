//! Hyperparameter search space
//!
//! A hyperparameter spec declares which model parameters are evolved alongside
//! the feature mask. Every parameter gets a fixed-width unsigned segment at the
//! front of the chromosome, rescaled linearly into its range on decode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EvolutionError;

/// Largest supported per-parameter bit width
pub const MAX_BITWIDTH: usize = 63;

/// Inclusive value range for one hyperparameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl ParamRange {
    /// Create a new range
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Get the range width (max - min)
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Check if a value is within the range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Map a value from [0, 1] into the range
    pub fn denormalize(&self, value: f64) -> f64 {
        self.min + value * self.width()
    }
}

impl From<(f64, f64)> for ParamRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// One evolved hyperparameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameter {
    /// Name the model template recognizes
    pub name: String,
    /// Value range after decoding
    pub range: ParamRange,
    /// Round the decoded value to the nearest integer (tree depth, neighbor count, ...)
    #[serde(default)]
    pub integral: bool,
}

impl Hyperparameter {
    /// A real-valued hyperparameter
    pub fn real(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            range: ParamRange::new(min, max),
            integral: false,
        }
    }

    /// An integer-valued hyperparameter
    pub fn integer(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            range: ParamRange::new(min, max),
            integral: true,
        }
    }
}

/// The set of hyperparameters evolved by a search, sharing one bit width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperparameterSpec {
    /// Bits per hyperparameter segment
    pub bitwidth: usize,
    /// Parameters, in chromosome order
    pub params: Vec<Hyperparameter>,
}

impl HyperparameterSpec {
    /// Create a spec with the given shared bit width
    pub fn new(bitwidth: usize) -> Self {
        Self {
            bitwidth,
            params: Vec::new(),
        }
    }

    /// Add a parameter (builder style)
    pub fn with_param(mut self, param: Hyperparameter) -> Self {
        self.params.push(param);
        self
    }

    /// Number of hyperparameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if no hyperparameters are declared
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Total bits taken by all hyperparameter segments
    pub fn total_bits(&self) -> usize {
        self.params.len() * self.bitwidth
    }

    /// Largest raw value a segment can hold, `2^bitwidth - 1`
    pub fn max_raw(&self) -> u64 {
        (1u64 << self.bitwidth) - 1
    }

    /// Check the parameter set is usable
    pub fn validate(&self) -> Result<(), EvolutionError> {
        if self.bitwidth == 0 || self.bitwidth > MAX_BITWIDTH {
            return Err(EvolutionError::Configuration(format!(
                "hyperparameter bitwidth should be between 1 and {}, got {}",
                MAX_BITWIDTH, self.bitwidth
            )));
        }
        if self.params.is_empty() {
            return Err(EvolutionError::Configuration(
                "hyperparameter spec declares no parameters".to_string(),
            ));
        }
        for (i, param) in self.params.iter().enumerate() {
            let ParamRange { min, max } = param.range;
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(EvolutionError::Configuration(format!(
                    "hyperparameter '{}' has invalid range [{}, {}]",
                    param.name, min, max
                )));
            }
            if self.params[..i].iter().any(|p| p.name == param.name) {
                return Err(EvolutionError::Configuration(format!(
                    "hyperparameter '{}' declared twice",
                    param.name
                )));
            }
        }
        Ok(())
    }
}

/// A decoded hyperparameter value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Integral parameter, rounded after rescaling
    Integer(i64),
    /// Real-valued parameter
    Real(f64),
}

impl ParamValue {
    /// The value as f64
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Integer(v) => v as f64,
            Self::Real(v) => v,
        }
    }

    /// The value as i64, if integral
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Integer(v) => Some(v),
            Self::Real(_) => None,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Real(v) => write!(f, "{:.6}", v),
        }
    }
}

/// Decoded hyperparameter values keyed by name
pub type Hyperparameters = BTreeMap<String, ParamValue>;

//! Chromosome codec
//!
//! Maps between a chromosome and the candidate it stands for: a feature mask
//! plus, when hyperparameters are evolved, their decoded values.

use serde::{Deserialize, Serialize};

use crate::error::GenomeError;
use crate::genome::bit_string::BitString;
use crate::genome::hyperparams::{HyperparameterSpec, Hyperparameters, ParamValue, MAX_BITWIDTH};
use crate::genome::layout::ChromosomeLayout;
use crate::genome::traits::BinaryGenome;

/// Decoded form of a chromosome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Feature selection mask, `true` = selected
    pub support: Vec<bool>,
    /// Decoded hyperparameter values (empty when none are evolved)
    pub params: Hyperparameters,
}

impl Candidate {
    /// Number of selected features
    pub fn n_selected(&self) -> usize {
        self.support.iter().filter(|&&b| b).count()
    }

    /// Column indices of the selected features
    pub fn selected_indices(&self) -> Vec<usize> {
        selected_indices(&self.support)
    }
}

/// Column indices of the set bits of a mask
pub fn selected_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &selected)| selected.then_some(i))
        .collect()
}

/// Encode a feature mask: bit i set means feature i selected
pub fn encode_features(mask: &[bool]) -> BitString {
    BitString::new(mask.to_vec())
}

/// Decode a feature-only bit sequence into a mask
pub fn decode_features(bits: &BitString) -> Vec<bool> {
    bits.bits().to_vec()
}

/// Interpret bits as an unsigned binary number, most significant bit first
pub fn bits_to_unsigned(bits: &[bool]) -> u64 {
    bits.iter()
        .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit))
}

/// Decode the hyperparameter prefix of a chromosome
///
/// Each segment's unsigned value is rescaled from `[0, 2^bitwidth - 1]` onto
/// the parameter's `[min, max]`; integral parameters are rounded half to even
/// afterwards.
pub fn decode_hyperparameters(
    bits: &[bool],
    spec: &HyperparameterSpec,
) -> Result<Hyperparameters, GenomeError> {
    if spec.bitwidth == 0 || spec.bitwidth > MAX_BITWIDTH {
        return Err(GenomeError::InvalidStructure(format!(
            "hyperparameter bitwidth should be between 1 and {}, got {}",
            MAX_BITWIDTH, spec.bitwidth
        )));
    }
    if bits.len() < spec.total_bits() {
        return Err(GenomeError::DimensionMismatch {
            expected: spec.total_bits(),
            actual: bits.len(),
        });
    }
    let max_raw = spec.max_raw() as f64;
    let params = spec
        .params
        .iter()
        .zip(bits.chunks_exact(spec.bitwidth))
        .map(|(param, segment)| {
            let fraction = bits_to_unsigned(segment) as f64 / max_raw;
            let value = param.range.denormalize(fraction);
            let value = if param.integral {
                ParamValue::Integer(value.round_ties_even() as i64)
            } else {
                ParamValue::Real(value)
            };
            (param.name.clone(), value)
        })
        .collect();
    Ok(params)
}

/// Decode a full chromosome into its feature mask and hyperparameter values
pub fn decode(
    chromosome: &BitString,
    hparams: Option<&HyperparameterSpec>,
) -> Result<Candidate, GenomeError> {
    let layout = ChromosomeLayout::new(
        chromosome.len().saturating_sub(hparams.map_or(0, HyperparameterSpec::total_bits)),
        hparams,
    );
    layout.check(chromosome)?;
    let params = match hparams {
        Some(spec) => decode_hyperparameters(layout.hyperparameter_segment(chromosome), spec)?,
        None => Hyperparameters::new(),
    };
    Ok(Candidate {
        support: layout.feature_bits(chromosome).to_vec(),
        params,
    })
}

//! Chromosome segment layout
//!
//! A chromosome is `[hp_0 | hp_1 | ... | hp_{n-1} | features]`. Each
//! hyperparameter segment is `bitwidth` bits wide; the feature segment is
//! everything after the last hyperparameter segment.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::GenomeError;
use crate::genome::bit_string::BitString;
use crate::genome::hyperparams::HyperparameterSpec;
use crate::genome::traits::BinaryGenome;

/// Static segment boundaries of a chromosome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromosomeLayout {
    n_features: usize,
    hyperparameters: usize,
    bitwidth: usize,
}

impl ChromosomeLayout {
    /// Layout for a features-only chromosome
    pub fn features_only(n_features: usize) -> Self {
        Self {
            n_features,
            hyperparameters: 0,
            bitwidth: 0,
        }
    }

    /// Layout for the given feature count and optional hyperparameter spec
    pub fn new(n_features: usize, hparams: Option<&HyperparameterSpec>) -> Self {
        match hparams {
            Some(spec) => Self {
                n_features,
                hyperparameters: spec.len(),
                bitwidth: spec.bitwidth,
            },
            None => Self::features_only(n_features),
        }
    }

    /// Number of feature bits
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of hyperparameter segments
    pub fn n_hyperparameters(&self) -> usize {
        self.hyperparameters
    }

    /// Total bits in front of the feature segment
    pub fn hyperparameter_bits(&self) -> usize {
        self.hyperparameters * self.bitwidth
    }

    /// Total chromosome length
    pub fn len(&self) -> usize {
        self.hyperparameter_bits() + self.n_features
    }

    /// Check if the chromosome has no bits at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether variation has to be applied segment by segment
    pub fn is_segmented(&self) -> bool {
        self.hyperparameters > 0
    }

    /// Bit range of the i-th hyperparameter
    pub fn hyperparameter_range(&self, index: usize) -> Option<Range<usize>> {
        if index >= self.hyperparameters {
            return None;
        }
        let start = index * self.bitwidth;
        Some(start..start + self.bitwidth)
    }

    /// Bit range of the feature segment
    pub fn feature_range(&self) -> Range<usize> {
        self.hyperparameter_bits()..self.len()
    }

    /// All segment ranges in chromosome order, feature segment last
    pub fn segments(&self) -> Vec<Range<usize>> {
        (0..self.hyperparameters)
            .filter_map(|i| self.hyperparameter_range(i))
            .chain(std::iter::once(self.feature_range()))
            .collect()
    }

    /// Check a chromosome has this layout's length
    pub fn check(&self, chromosome: &BitString) -> Result<(), GenomeError> {
        if chromosome.len() != self.len() {
            return Err(GenomeError::DimensionMismatch {
                expected: self.len(),
                actual: chromosome.len(),
            });
        }
        Ok(())
    }

    /// The feature bits of a chromosome
    pub fn feature_bits<'a>(&self, chromosome: &'a BitString) -> &'a [bool] {
        &chromosome.bits()[self.feature_range()]
    }

    /// The hyperparameter bits of a chromosome
    pub fn hyperparameter_segment<'a>(&self, chromosome: &'a BitString) -> &'a [bool] {
        &chromosome.bits()[..self.hyperparameter_bits()]
    }

    /// Split a chromosome into its segments
    pub fn split(&self, chromosome: &BitString) -> Result<Vec<BitString>, GenomeError> {
        self.check(chromosome)?;
        self.segments()
            .into_iter()
            .map(|range| chromosome.segment(range))
            .collect()
    }

    /// Join segments produced by [`split`](Self::split) back into a chromosome
    pub fn join(&self, segments: &[BitString]) -> Result<BitString, GenomeError> {
        let expected = self.segments();
        if segments.len() != expected.len() {
            return Err(GenomeError::InvalidStructure(format!(
                "expected {} segments, got {}",
                expected.len(),
                segments.len()
            )));
        }
        for (segment, range) in segments.iter().zip(expected.iter()) {
            if segment.len() != range.len() {
                return Err(GenomeError::DimensionMismatch {
                    expected: range.len(),
                    actual: segment.len(),
                });
            }
        }
        Ok(BitString::concat(segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::hyperparams::Hyperparameter;

    fn two_param_layout() -> ChromosomeLayout {
        let spec = HyperparameterSpec::new(3)
            .with_param(Hyperparameter::real("a", 0.0, 1.0))
            .with_param(Hyperparameter::integer("b", 1.0, 8.0));
        ChromosomeLayout::new(5, Some(&spec))
    }

    #[test]
    fn test_features_only() {
        let layout = ChromosomeLayout::features_only(7);
        assert_eq!(layout.len(), 7);
        assert_eq!(layout.hyperparameter_bits(), 0);
        assert!(!layout.is_segmented());
        assert_eq!(layout.segments(), vec![0..7]);
    }

    #[test]
    fn test_segment_boundaries() {
        let layout = two_param_layout();
        assert_eq!(layout.len(), 11);
        assert_eq!(layout.hyperparameter_bits(), 6);
        assert_eq!(layout.segments(), vec![0..3, 3..6, 6..11]);
        assert_eq!(layout.hyperparameter_range(1), Some(3..6));
        assert_eq!(layout.hyperparameter_range(2), None);
    }

    #[test]
    fn test_split_join_preserves_chromosome() {
        let layout = two_param_layout();
        let chromosome = BitString::from([
            true, false, true, false, false, true, true, true, false, false, true,
        ]);
        let segments = layout.split(&chromosome).unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].bits(), &[true, true, false, false, true]);
        assert_eq!(layout.join(&segments).unwrap(), chromosome);
    }

    #[test]
    fn test_feature_bits() {
        let layout = two_param_layout();
        let chromosome = BitString::from([
            true, true, true, false, false, false, true, false, true, false, true,
        ]);
        assert_eq!(
            layout.feature_bits(&chromosome),
            &[true, false, true, false, true]
        );
        assert_eq!(layout.hyperparameter_segment(&chromosome).len(), 6);
    }

    #[test]
    fn test_split_wrong_length() {
        let layout = two_param_layout();
        assert!(layout.split(&BitString::zeros(10)).is_err());
    }

    #[test]
    fn test_join_rejects_wrong_segment_width() {
        let layout = two_param_layout();
        let segments = vec![BitString::zeros(3), BitString::zeros(4), BitString::zeros(4)];
        assert!(matches!(
            layout.join(&segments),
            Err(GenomeError::DimensionMismatch { .. })
        ));
    }
}

//! Core genome traits
//!
//! This module defines the `EvolutionaryGenome` trait and the binary genome
//! abstraction the variation operators work against.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::GenomeError;

/// Core genome abstraction for evolutionary algorithms.
///
/// Genomes must be cloneable, serializable, and thread-safe so that a
/// population can be evaluated across a worker pool.
pub trait EvolutionaryGenome: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The allele type for individual genes
    type Allele: Clone + Send;

    /// The phenotype or decoded solution type
    type Phenotype;

    /// Decode genome into phenotype
    fn decode(&self) -> Self::Phenotype;

    /// Number of genes
    fn dimension(&self) -> usize;

    /// Distance metric between two genomes (default: 0.0)
    fn distance(&self, _other: &Self) -> f64 {
        0.0
    }
}

/// Trait for genomes that can be represented as bit strings
pub trait BinaryGenome: EvolutionaryGenome<Allele = bool> {
    /// Get the bits as a slice
    fn bits(&self) -> &[bool];

    /// Get the bits as a mutable slice
    fn bits_mut(&mut self) -> &mut [bool];

    /// Create from a vector of bits
    fn from_bits(bits: Vec<bool>) -> Result<Self, GenomeError>;

    /// Count the number of true bits (ones)
    fn count_ones(&self) -> usize {
        self.bits().iter().filter(|&&b| b).count()
    }

    /// Count the number of false bits (zeros)
    fn count_zeros(&self) -> usize {
        self.bits().iter().filter(|&&b| !b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct MockBits {
        bits: Vec<bool>,
    }

    impl EvolutionaryGenome for MockBits {
        type Allele = bool;
        type Phenotype = usize;

        fn decode(&self) -> Self::Phenotype {
            self.count_ones()
        }

        fn dimension(&self) -> usize {
            self.bits.len()
        }
    }

    impl BinaryGenome for MockBits {
        fn bits(&self) -> &[bool] {
            &self.bits
        }

        fn bits_mut(&mut self) -> &mut [bool] {
            &mut self.bits
        }

        fn from_bits(bits: Vec<bool>) -> Result<Self, GenomeError> {
            if bits.is_empty() {
                return Err(GenomeError::InvalidStructure("no bits".to_string()));
            }
            Ok(Self { bits })
        }
    }

    #[test]
    fn test_mock_counts() {
        let genome = MockBits::from_bits(vec![true, false, true, true]).unwrap();
        assert_eq!(genome.count_ones(), 3);
        assert_eq!(genome.count_zeros(), 1);
        assert_eq!(genome.decode(), 3);
    }

    #[test]
    fn test_default_distance() {
        let a = MockBits::from_bits(vec![true]).unwrap();
        let b = MockBits::from_bits(vec![false]).unwrap();
        assert_eq!(a.distance(&b), 0.0);
    }

    #[test]
    fn test_from_bits_rejects_empty() {
        assert!(MockBits::from_bits(Vec::new()).is_err());
    }
}

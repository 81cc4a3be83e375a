//! Bit string genome
//!
//! This module provides the fixed-length bit string used as the chromosome of
//! a feature-selection search.

use std::ops::Range;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenomeError;
use crate::genome::traits::{BinaryGenome, EvolutionaryGenome};

/// Fixed-length bit string genome
///
/// The length is fixed at creation. Operators act position by position and
/// never resize it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitString {
    /// The bits of this genome
    bits: Vec<bool>,
}

impl BitString {
    /// Create a new bit string with the given bits
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Create an all-zeros bit string of the given length
    pub fn zeros(length: usize) -> Self {
        Self {
            bits: vec![false; length],
        }
    }

    /// Create an all-ones bit string of the given length
    pub fn ones(length: usize) -> Self {
        Self {
            bits: vec![true; length],
        }
    }

    /// Create a bit string of the given length with exactly `ones` set bits
    /// at uniformly random positions.
    pub fn random_with_ones<R: Rng>(length: usize, ones: usize, rng: &mut R) -> Self {
        let ones = ones.min(length);
        let mut bits = vec![true; ones];
        bits.resize(length, false);
        bits.shuffle(rng);
        Self { bits }
    }

    /// Get the length of the bit string
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if the bit string is empty
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Get a specific bit
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    /// Set a specific bit
    pub fn set(&mut self, index: usize, value: bool) {
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = value;
        }
    }

    /// Flip a specific bit
    pub fn flip(&mut self, index: usize) {
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = !*bit;
        }
    }

    /// Hamming distance to another bit string
    pub fn hamming_distance(&self, other: &Self) -> usize {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Copy out a contiguous segment
    pub fn segment(&self, range: Range<usize>) -> Result<Self, GenomeError> {
        if range.start > range.end || range.end > self.bits.len() {
            return Err(GenomeError::SegmentOutOfRange {
                start: range.start,
                end: range.end,
                len: self.bits.len(),
            });
        }
        Ok(Self {
            bits: self.bits[range].to_vec(),
        })
    }

    /// Concatenate segments back into one bit string, in order
    pub fn concat<'a, I>(segments: I) -> Self
    where
        I: IntoIterator<Item = &'a BitString>,
    {
        let bits = segments
            .into_iter()
            .flat_map(|s| s.bits.iter().copied())
            .collect();
        Self { bits }
    }
}

impl EvolutionaryGenome for BitString {
    type Allele = bool;
    type Phenotype = Vec<bool>;

    fn decode(&self) -> Self::Phenotype {
        self.bits.clone()
    }

    fn dimension(&self) -> usize {
        self.bits.len()
    }

    fn distance(&self, other: &Self) -> f64 {
        self.hamming_distance(other) as f64
    }
}

impl BinaryGenome for BitString {
    fn bits(&self) -> &[bool] {
        &self.bits
    }

    fn bits_mut(&mut self) -> &mut [bool] {
        &mut self.bits
    }

    fn from_bits(bits: Vec<bool>) -> Result<Self, GenomeError> {
        Ok(Self { bits })
    }
}

impl std::ops::Index<usize> for BitString {
    type Output = bool;

    fn index(&self, index: usize) -> &Self::Output {
        &self.bits[index]
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl<const N: usize> From<[bool; N]> for BitString {
    fn from(arr: [bool; N]) -> Self {
        Self { bits: arr.to_vec() }
    }
}

impl std::fmt::Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in &self.bits {
            write!(f, "{}", if *bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bit_string_new() {
        let bs = BitString::new(vec![true, false, true]);
        assert_eq!(bs.len(), 3);
        assert_eq!(bs.bits(), &[true, false, true]);
    }

    #[test]
    fn test_bit_string_zeros_ones() {
        let zeros = BitString::zeros(5);
        assert_eq!(zeros.count_ones(), 0);
        assert_eq!(zeros.count_zeros(), 5);

        let ones = BitString::ones(5);
        assert_eq!(ones.count_ones(), 5);
    }

    #[test]
    fn test_random_with_ones_exact_count() {
        let mut rng = StdRng::seed_from_u64(7);
        for k in 0..=12 {
            let bs = BitString::random_with_ones(12, k, &mut rng);
            assert_eq!(bs.len(), 12);
            assert_eq!(bs.count_ones(), k);
        }
    }

    #[test]
    fn test_random_with_ones_clamped() {
        let mut rng = StdRng::seed_from_u64(7);
        let bs = BitString::random_with_ones(3, 10, &mut rng);
        assert_eq!(bs, BitString::ones(3));
    }

    #[test]
    fn test_bit_string_get_set_flip() {
        let mut bs = BitString::zeros(3);
        assert_eq!(bs.get(0), Some(false));
        assert_eq!(bs.get(3), None);

        bs.set(1, true);
        assert_eq!(bs.get(1), Some(true));

        bs.flip(1);
        bs.flip(2);
        assert_eq!(bs.bits(), &[false, false, true]);
    }

    #[test]
    fn test_bit_string_hamming_distance() {
        let bs1 = BitString::new(vec![true, false, true, false]);
        let bs2 = BitString::new(vec![true, true, false, false]);
        assert_eq!(bs1.hamming_distance(&bs2), 2);
        assert_eq!(bs1.distance(&bs2), 2.0);
    }

    #[test]
    fn test_segment_and_concat() {
        let bs = BitString::from([true, true, false, true, false, false]);
        let head = bs.segment(0..2).unwrap();
        let mid = bs.segment(2..4).unwrap();
        let tail = bs.segment(4..6).unwrap();
        assert_eq!(head.bits(), &[true, true]);
        assert_eq!(mid.bits(), &[false, true]);

        let joined = BitString::concat([&head, &mid, &tail]);
        assert_eq!(joined, bs);
    }

    #[test]
    fn test_segment_out_of_range() {
        let bs = BitString::zeros(4);
        assert!(matches!(
            bs.segment(2..6),
            Err(GenomeError::SegmentOutOfRange { len: 4, .. })
        ));
    }

    #[test]
    fn test_bit_string_display() {
        let bs = BitString::new(vec![true, false, true, true]);
        assert_eq!(format!("{}", bs), "1011");
    }

    #[test]
    fn test_bit_string_indexing() {
        let bs = BitString::new(vec![true, false, true]);
        assert!(bs[0]);
        assert!(!bs[1]);
        assert!(bs[2]);
    }

    #[test]
    fn test_bit_string_serialization() {
        let bs = BitString::new(vec![true, false, true]);
        let serialized = serde_json::to_string(&bs).unwrap();
        let deserialized: BitString = serde_json::from_str(&serialized).unwrap();
        assert_eq!(bs, deserialized);
    }
}

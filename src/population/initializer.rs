//! Population initialization
//!
//! Creates chromosomes that respect the selected-feature bound at birth.
//! Variation may break the bound later; the evaluator penalizes that.

use rand::Rng;

use crate::error::EvolutionError;
use crate::genome::bit_string::BitString;
use crate::genome::layout::ChromosomeLayout;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Random chromosome factory for one layout
#[derive(Clone, Debug)]
pub struct Initializer {
    layout: ChromosomeLayout,
    max_features: usize,
}

impl Initializer {
    /// Create an initializer
    ///
    /// Fails unless `1 <= max_features <= layout.n_features()`.
    pub fn new(layout: ChromosomeLayout, max_features: usize) -> Result<Self, EvolutionError> {
        if max_features == 0 || max_features > layout.n_features() {
            return Err(EvolutionError::Configuration(format!(
                "max_features must be in [1, {}], got {}",
                layout.n_features(),
                max_features
            )));
        }
        Ok(Self {
            layout,
            max_features,
        })
    }

    /// The chromosome layout
    pub fn layout(&self) -> &ChromosomeLayout {
        &self.layout
    }

    /// Upper bound on selected features at creation
    pub fn max_features(&self) -> usize {
        self.max_features
    }

    /// Create one chromosome
    ///
    /// The feature segment has between 1 and `max_features` ones at random
    /// positions. When hyperparameters are configured, a hyperparameter
    /// segment with between 0 and all of its bits set is placed in front.
    pub fn create_chromosome<R: Rng>(&self, rng: &mut R) -> BitString {
        let n_features = self.layout.n_features();
        let k = rng.gen_range(1..=self.max_features);
        let features = BitString::random_with_ones(n_features, k, rng);

        if !self.layout.is_segmented() {
            return features;
        }
        let hp_bits = self.layout.hyperparameter_bits();
        let m = rng.gen_range(0..=hp_bits);
        let hyperparameters = BitString::random_with_ones(hp_bits, m, rng);
        BitString::concat([&hyperparameters, &features])
    }

    /// Create one unevaluated individual
    pub fn create_individual<R: Rng>(&self, rng: &mut R) -> Individual<BitString> {
        Individual::new(self.create_chromosome(rng))
    }

    /// Create an unevaluated population of `size` individuals
    pub fn create_population<R: Rng>(&self, size: usize, rng: &mut R) -> Population<BitString> {
        (0..size).map(|_| self.create_individual(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::hyperparams::{Hyperparameter, HyperparameterSpec};
    use crate::genome::traits::BinaryGenome;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_max_features_bounds() {
        let layout = ChromosomeLayout::features_only(5);
        assert!(Initializer::new(layout.clone(), 0).is_err());
        assert!(Initializer::new(layout.clone(), 6).is_err());
        assert!(Initializer::new(layout, 5).is_ok());
    }

    #[test]
    fn test_features_only_chromosome() {
        let mut rng = StdRng::seed_from_u64(42);
        let init = Initializer::new(ChromosomeLayout::features_only(10), 4).unwrap();
        for _ in 0..200 {
            let chromosome = init.create_chromosome(&mut rng);
            assert_eq!(chromosome.len(), 10);
            let ones = chromosome.count_ones();
            assert!((1..=4).contains(&ones), "got {ones} ones");
        }
    }

    #[test]
    fn test_all_counts_reachable() {
        let mut rng = StdRng::seed_from_u64(3);
        let init = Initializer::new(ChromosomeLayout::features_only(6), 3).unwrap();
        let mut seen = [false; 4];
        for _ in 0..300 {
            seen[init.create_chromosome(&mut rng).count_ones()] = true;
        }
        assert_eq!(seen, [false, true, true, true]);
    }

    #[test]
    fn test_segmented_chromosome() {
        let mut rng = StdRng::seed_from_u64(9);
        let spec = HyperparameterSpec::new(4)
            .with_param(Hyperparameter::real("alpha", 0.0, 1.0))
            .with_param(Hyperparameter::integer("depth", 1.0, 8.0));
        let layout = ChromosomeLayout::new(7, Some(&spec));
        let init = Initializer::new(layout.clone(), 2).unwrap();

        for _ in 0..100 {
            let chromosome = init.create_chromosome(&mut rng);
            assert_eq!(chromosome.len(), 8 + 7);
            let feature_ones = layout.feature_bits(&chromosome).iter().filter(|b| **b).count();
            assert!((1..=2).contains(&feature_ones));
        }
    }

    #[test]
    fn test_create_population() {
        let mut rng = StdRng::seed_from_u64(1);
        let init = Initializer::new(ChromosomeLayout::features_only(8), 8).unwrap();
        let pop = init.create_population(12, &mut rng);
        assert_eq!(pop.len(), 12);
        assert_eq!(pop.count_evaluated(), 0);
    }
}

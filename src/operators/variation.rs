//! Offspring variation
//!
//! Applies crossover then mutation to a pool of selected offspring. Crossover
//! pairs neighbours `(0, 1), (2, 3), ...`; an odd trailing offspring is only
//! eligible for mutation.

use rand::Rng;

use crate::error::{EvoResult, OperatorError};
use crate::genome::bit_string::BitString;
use crate::genome::layout::ChromosomeLayout;
use crate::genome::traits::BinaryGenome;
use crate::operators::traits::{CrossoverOperator, MutationOperator};

/// Crossover and mutation with their application rates
#[derive(Clone, Debug)]
pub struct Variation<C, M> {
    crossover: C,
    mutation: M,
    crossover_rate: f64,
    mutation_rate: f64,
}

fn check_rate(name: &str, rate: f64) -> Result<(), OperatorError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(OperatorError::InvalidConfiguration(format!(
            "{name} must be in [0, 1], got {rate}"
        )))
    }
}

impl<C, M> Variation<C, M> {
    /// Create a variation step
    ///
    /// `crossover_rate` is the probability that a pair is mated and
    /// `mutation_rate` the probability that an individual is mutated.
    pub fn new(
        crossover: C,
        mutation: M,
        crossover_rate: f64,
        mutation_rate: f64,
    ) -> Result<Self, OperatorError> {
        check_rate("crossover rate", crossover_rate)?;
        check_rate("mutation rate", mutation_rate)?;
        Ok(Self {
            crossover,
            mutation,
            crossover_rate,
            mutation_rate,
        })
    }

    /// Probability that a pair is mated
    pub fn crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    /// Probability that an individual is mutated
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Vary genomes in place
    ///
    /// Returns one flag per genome telling whether an operator was applied
    /// to it. Applied operators invalidate fitness even when the bits happen
    /// to come out unchanged.
    pub fn vary<G, R>(&self, genomes: &mut [G], rng: &mut R) -> Result<Vec<bool>, OperatorError>
    where
        G: BinaryGenome,
        C: CrossoverOperator<G>,
        M: MutationOperator<G>,
        R: Rng,
    {
        let mut touched = vec![false; genomes.len()];

        for i in (1..genomes.len()).step_by(2) {
            if rng.gen::<f64>() < self.crossover_rate {
                let (child1, child2) = self
                    .crossover
                    .crossover(&genomes[i - 1], &genomes[i], rng)
                    .into_result()?;
                genomes[i - 1] = child1;
                genomes[i] = child2;
                touched[i - 1] = true;
                touched[i] = true;
            }
        }

        for (genome, touched) in genomes.iter_mut().zip(touched.iter_mut()) {
            if rng.gen::<f64>() < self.mutation_rate {
                self.mutation.mutate(genome, rng);
                *touched = true;
            }
        }

        Ok(touched)
    }

    /// Vary chromosomes segment by segment
    ///
    /// Every segment of `layout` is varied as its own pool, so no operator
    /// mixes bits across a segment boundary. Segment order and lengths are
    /// preserved. A genome is flagged if any of its segments was touched.
    pub fn vary_segmented<R>(
        &self,
        genomes: &mut [BitString],
        layout: &ChromosomeLayout,
        rng: &mut R,
    ) -> EvoResult<Vec<bool>>
    where
        C: CrossoverOperator<BitString>,
        M: MutationOperator<BitString>,
        R: Rng,
    {
        if !layout.is_segmented() {
            return Ok(self.vary(genomes, rng)?);
        }

        let split = genomes
            .iter()
            .map(|g| layout.split(g))
            .collect::<Result<Vec<_>, _>>()?;
        let n_segments = layout.segments().len();

        let mut touched = vec![false; genomes.len()];
        let mut columns: Vec<Vec<BitString>> = (0..n_segments)
            .map(|s| split.iter().map(|parts| parts[s].clone()).collect())
            .collect();
        for column in &mut columns {
            let column_touched = self.vary(column, rng)?;
            for (flag, hit) in touched.iter_mut().zip(column_touched) {
                *flag |= hit;
            }
        }

        for (i, genome) in genomes.iter_mut().enumerate() {
            let parts: Vec<BitString> = columns.iter().map(|column| column[i].clone()).collect();
            *genome = layout.join(&parts)?;
        }
        Ok(touched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::hyperparams::{Hyperparameter, HyperparameterSpec};
    use crate::operators::crossover::UniformCrossover;
    use crate::operators::mutation::BitFlipMutation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn variation(cx: f64, mut_rate: f64, swap: f64, flip: f64) -> Variation<UniformCrossover, BitFlipMutation> {
        Variation::new(
            UniformCrossover::new(swap).unwrap(),
            BitFlipMutation::new(flip).unwrap(),
            cx,
            mut_rate,
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_rates() {
        let result = Variation::new(
            UniformCrossover::default(),
            BitFlipMutation::default(),
            1.2,
            0.2,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_rates_touch_nothing() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut genomes = vec![BitString::zeros(8), BitString::ones(8), BitString::zeros(8)];
        let before = genomes.clone();

        let touched = variation(0.0, 0.0, 0.5, 0.5).vary(&mut genomes, &mut rng).unwrap();
        assert_eq!(touched, vec![false; 3]);
        assert_eq!(genomes, before);
    }

    #[test]
    fn test_full_crossover_touches_pairs_only() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut genomes = vec![
            BitString::zeros(4),
            BitString::ones(4),
            BitString::zeros(4),
        ];

        let touched = variation(1.0, 0.0, 1.0, 0.0).vary(&mut genomes, &mut rng).unwrap();
        assert_eq!(touched, vec![true, true, false]);
        assert_eq!(genomes[0], BitString::ones(4));
        assert_eq!(genomes[1], BitString::zeros(4));
    }

    #[test]
    fn test_applied_operator_flags_unchanged_bits() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut genomes = vec![BitString::ones(4), BitString::ones(4)];
        let touched = variation(1.0, 0.0, 0.5, 0.0).vary(&mut genomes, &mut rng).unwrap();
        assert_eq!(touched, vec![true, true]);
        assert_eq!(genomes, vec![BitString::ones(4), BitString::ones(4)]);
    }

    #[test]
    fn test_segmented_preserves_boundaries() {
        let mut rng = StdRng::seed_from_u64(5);
        let spec = HyperparameterSpec::new(3)
            .with_param(Hyperparameter::real("a", 0.0, 1.0))
            .with_param(Hyperparameter::real("b", 0.0, 1.0));
        let layout = ChromosomeLayout::new(4, Some(&spec));

        // hp segments all ones in parent 1, all zeros in parent 2; features reversed
        let parent1 = BitString::concat([&BitString::ones(6), &BitString::zeros(4)]);
        let parent2 = BitString::concat([&BitString::zeros(6), &BitString::ones(4)]);
        let mut genomes = vec![parent1, parent2];

        let touched = variation(1.0, 0.0, 1.0, 0.0)
            .vary_segmented(&mut genomes, &layout, &mut rng)
            .unwrap();
        assert_eq!(touched, vec![true, true]);
        assert_eq!(genomes[0].len(), 10);
        assert_eq!(genomes[0], BitString::concat([&BitString::zeros(6), &BitString::ones(4)]));
        assert_eq!(genomes[1], BitString::concat([&BitString::ones(6), &BitString::zeros(4)]));
    }

    #[test]
    fn test_segmented_without_hyperparameters_matches_plain() {
        let layout = ChromosomeLayout::features_only(12);
        let make = || {
            vec![
                BitString::zeros(12),
                BitString::ones(12),
                BitString::from(vec![true; 6].into_iter().chain(vec![false; 6]).collect::<Vec<_>>()),
                BitString::zeros(12),
            ]
        };
        let var = variation(0.5, 0.5, 0.3, 0.2);

        let mut plain = make();
        let mut segmented = make();
        let t1 = var.vary(&mut plain, &mut StdRng::seed_from_u64(77)).unwrap();
        let t2 = var
            .vary_segmented(&mut segmented, &layout, &mut StdRng::seed_from_u64(77))
            .unwrap();
        assert_eq!(t1, t2);
        assert_eq!(plain, segmented);
    }

    #[test]
    fn test_segmented_rejects_wrong_length() {
        let mut rng = StdRng::seed_from_u64(5);
        let spec = HyperparameterSpec::new(2).with_param(Hyperparameter::real("a", 0.0, 1.0));
        let layout = ChromosomeLayout::new(3, Some(&spec));
        let mut genomes = vec![BitString::zeros(4)];
        assert!(variation(0.5, 0.5, 0.5, 0.5)
            .vary_segmented(&mut genomes, &layout, &mut rng)
            .is_err());
    }
}

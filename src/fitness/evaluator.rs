//! Cross-validated fitness evaluator
//!
//! Turns a chromosome into its objective triple: decode hyperparameters onto a
//! fresh model clone, reject infeasible feature counts, consult the cache, and
//! otherwise cross-validate on the selected columns.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::{trace, warn};

use crate::diagnostics::mean_std;
use crate::error::{EvaluationError, EvolutionError};
use crate::fitness::cache::{CacheKeyMode, CacheStats, CachedScore, FitnessCache};
use crate::fitness::collaborators::{CrossValidator, CvSettings, Dataset, Estimator};
use crate::fitness::traits::{Fitness, Objectives};
use crate::genome::bit_string::BitString;
use crate::genome::codec::{decode_hyperparameters, selected_indices};
use crate::genome::hyperparams::HyperparameterSpec;
use crate::genome::layout::ChromosomeLayout;
use crate::genome::traits::BinaryGenome;

/// Fitness function for genetic feature selection
///
/// Owns the model template, the scoring collaborator and the run's cache.
/// The dataset is borrowed for the evaluator's lifetime.
pub struct FeatureSelectionFitness<'d, E, V> {
    estimator: E,
    validator: V,
    data: &'d Dataset,
    settings: CvSettings,
    layout: ChromosomeLayout,
    hparams: Option<HyperparameterSpec>,
    max_features: usize,
    cache: Option<FitnessCache>,
    cache_key: CacheKeyMode,
    scoring_calls: AtomicUsize,
}

impl<'d, E, V> FeatureSelectionFitness<'d, E, V>
where
    E: Estimator,
    V: CrossValidator<E>,
{
    /// Create an evaluator over all of `data`'s features
    ///
    /// `max_features` must lie in `[1, n_features]`.
    pub fn new(
        estimator: E,
        validator: V,
        data: &'d Dataset,
        max_features: usize,
    ) -> Result<Self, EvolutionError> {
        let n_features = data.n_features();
        if max_features < 1 || max_features > n_features {
            return Err(EvolutionError::Configuration(format!(
                "'max_features' should be between 1 and {} features. Got {} instead.",
                n_features, max_features
            )));
        }
        Ok(Self {
            estimator,
            validator,
            data,
            settings: CvSettings::default(),
            layout: ChromosomeLayout::features_only(n_features),
            hparams: None,
            max_features,
            cache: None,
            cache_key: CacheKeyMode::default(),
            scoring_calls: AtomicUsize::new(0),
        })
    }

    /// Evolve the given hyperparameters alongside the feature mask
    pub fn with_hyperparameters(mut self, spec: HyperparameterSpec) -> Result<Self, EvolutionError> {
        spec.validate()?;
        self.layout = ChromosomeLayout::new(self.data.n_features(), Some(&spec));
        self.hparams = Some(spec);
        Ok(self)
    }

    /// Enable score caching with the given key mode
    pub fn with_cache(mut self, mode: CacheKeyMode) -> Self {
        self.cache = Some(FitnessCache::new());
        self.cache_key = mode;
        self
    }

    /// Set the cross-validation settings
    pub fn with_cv_settings(mut self, settings: CvSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Chromosome layout this evaluator expects
    pub fn layout(&self) -> &ChromosomeLayout {
        &self.layout
    }

    /// Upper bound on selected features
    pub fn max_features(&self) -> usize {
        self.max_features
    }

    /// Hyperparameter spec, if any
    pub fn hyperparameters(&self) -> Option<&HyperparameterSpec> {
        self.hparams.as_ref()
    }

    /// Number of times the scoring collaborator was invoked
    pub fn scoring_calls(&self) -> usize {
        self.scoring_calls.load(Ordering::Relaxed)
    }

    /// Evaluate one chromosome
    pub fn evaluate_chromosome(&self, chromosome: &BitString) -> Objectives {
        if let Err(e) = self.layout.check(chromosome) {
            warn!("Rejecting malformed chromosome: {}", e);
            return Objectives::infeasible(0);
        }

        let features = self.layout.feature_bits(chromosome);
        let count = features.iter().filter(|&&b| b).count();
        if count == 0 || count > self.max_features {
            return Objectives::infeasible(count);
        }

        let key = match self.cache_key {
            CacheKeyMode::FeaturesOnly => features,
            CacheKeyMode::FullChromosome => chromosome.bits(),
        };
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(key)) {
            trace!("Cache hit for {}", chromosome);
            return Objectives::new(cached.mean, count, cached.dispersion);
        }

        match self.cross_validate(chromosome, features) {
            Ok(score) => {
                if let Some(cache) = &self.cache {
                    cache.insert(key.to_vec(), score);
                }
                Objectives::new(score.mean, count, score.dispersion)
            }
            Err(e) => {
                warn!("Evaluation of {} failed, scoring as infeasible: {}", chromosome, e);
                Objectives::infeasible(count)
            }
        }
    }

    fn configured_estimator(&self, chromosome: &BitString) -> Result<E, EvaluationError> {
        let mut estimator = self.estimator.clone();
        if let Some(spec) = &self.hparams {
            let params =
                decode_hyperparameters(self.layout.hyperparameter_segment(chromosome), spec)
                    .map_err(|e| EvaluationError::Scoring(e.to_string()))?;
            for (name, value) in params {
                estimator.set_hyperparameter(&name, value)?;
            }
        }
        Ok(estimator)
    }

    fn cross_validate(
        &self,
        chromosome: &BitString,
        features: &[bool],
    ) -> Result<CachedScore, EvaluationError> {
        let estimator = self.configured_estimator(chromosome)?;
        let x = self.data.select_features(&selected_indices(features));

        self.scoring_calls.fetch_add(1, Ordering::Relaxed);
        let outcome = self.validator.cross_val_score(
            &estimator,
            &x,
            self.data.y(),
            self.data.groups(),
            &self.settings,
        )?;
        for warning in &outcome.warnings {
            trace!("Suppressed fit warning: {}", warning);
        }

        if let Some(&bad) = outcome.fold_scores.iter().find(|s| !s.is_finite()) {
            return Err(EvaluationError::NonFiniteScore(bad));
        }
        let (mean, dispersion) =
            mean_std(&outcome.fold_scores).ok_or(EvaluationError::EmptyScores)?;
        if !(mean.is_finite() && dispersion.is_finite()) {
            return Err(EvaluationError::NonFiniteScore(mean));
        }
        Ok(CachedScore { mean, dispersion })
    }
}

impl<'d, E, V> Fitness for FeatureSelectionFitness<'d, E, V>
where
    E: Estimator,
    V: CrossValidator<E>,
{
    type Genome = BitString;

    fn evaluate(&self, genome: &BitString) -> Objectives {
        self.evaluate_chromosome(genome)
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(FitnessCache::stats)
    }
}

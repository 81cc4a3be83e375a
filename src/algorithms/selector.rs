//! One-call feature selection
//!
//! Wires a [`SelectionConfig`] into the evaluator, operators, hall of fame and
//! executor, then runs [`GeneticSelection`].

use log::debug;
use rand::Rng;

use crate::algorithms::genetic_selection::GeneticSelection;
use crate::config::SelectionConfig;
use crate::diagnostics::SearchResult;
use crate::error::EvoResult;
use crate::fitness::collaborators::{CrossValidator, Dataset, Estimator};
use crate::fitness::evaluator::FeatureSelectionFitness;
use crate::operators::crossover::UniformCrossover;
use crate::operators::mutation::BitFlipMutation;
use crate::operators::selection::TournamentSelection;
use crate::population::hall_of_fame::HallOfFame;
use crate::population::initializer::Initializer;

/// Search for the best feature subset of `data`
///
/// `estimator` is the model template and `validator` scores it on each
/// candidate subset. The configuration is validated against the dataset
/// before anything is evaluated.
pub fn select_features<E, V, R>(
    estimator: E,
    validator: V,
    data: &Dataset,
    config: &SelectionConfig,
    rng: &mut R,
) -> EvoResult<SearchResult>
where
    E: Estimator,
    V: CrossValidator<E>,
    R: Rng,
{
    let max_features = config.validate(data.n_features())?;
    debug!("Resolved max_features = {}", max_features);

    let mut fitness = FeatureSelectionFitness::new(estimator, validator, data, max_features)?
        .with_cv_settings(config.cv.clone());
    if let Some(spec) = &config.hparams {
        fitness = fitness.with_hyperparameters(spec.clone())?;
    }
    if config.caching {
        fitness = fitness.with_cache(config.cache_key);
    }

    let initializer = Initializer::new(fitness.layout().clone(), max_features)?;
    let selection = TournamentSelection::new(config.tournament_size)?;
    let crossover = UniformCrossover::new(config.crossover_independent_proba)?;
    let mutation = BitFlipMutation::new(config.mutation_independent_proba)?;

    let search = GeneticSelection::builder()
        .config(config.loop_config())
        .initializer(initializer)
        .hyperparameters(config.hparams.clone())
        .hall_of_fame(HallOfFame::new(config.hall_of_fame_size)?)
        .selection(selection)
        .crossover(crossover)
        .mutation(mutation)
        .fitness(fitness)
        .executor(config.executor()?)
        .build()?;

    search.run(rng)
}

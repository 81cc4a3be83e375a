//! Feature Selection on a Synthetic Regression Problem
//!
//! This demo builds a dataset where only three of twelve columns carry
//! signal, then lets the genetic search pick the columns and the ridge
//! penalty of a small least-squares model scored by k-fold R².
//!
//! Run with `RUST_LOG=info` to see the per-generation logbook.

use genetic_selection::prelude::*;
use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Ridge regression with a tunable penalty
#[derive(Clone, Debug)]
struct Ridge {
    alpha: f64,
}

impl Ridge {
    fn fit(&self, x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
        let xt = x.transpose();
        let gram = &xt * x + DMatrix::identity(x.ncols(), x.ncols()) * self.alpha;
        gram.cholesky().map(|c| c.solve(&(&xt * y)))
    }
}

impl Estimator for Ridge {
    fn set_hyperparameter(&mut self, name: &str, value: ParamValue) -> Result<(), EvaluationError> {
        match (name, value) {
            ("alpha", ParamValue::Real(alpha)) => {
                self.alpha = alpha;
                Ok(())
            }
            _ => Err(EvaluationError::UnknownHyperparameter(name.to_string())),
        }
    }
}

/// Contiguous k-fold scored by R²
struct KFoldR2;

fn rows(m: &DMatrix<f64>, idx: &[usize]) -> DMatrix<f64> {
    m.select_rows(idx)
}

impl CrossValidator<Ridge> for KFoldR2 {
    fn cross_val_score(
        &self,
        model: &Ridge,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        _groups: Option<&[usize]>,
        settings: &CvSettings,
    ) -> Result<CvOutcome, EvaluationError> {
        let n = x.nrows();
        let k = settings.strategy.n_splits();
        let mut scores = Vec::with_capacity(k);

        for fold in 0..k {
            let (start, end) = (fold * n / k, (fold + 1) * n / k);
            let test: Vec<usize> = (start..end).collect();
            let train: Vec<usize> = (0..n).filter(|i| *i < start || *i >= end).collect();

            let y_train = DVector::from_iterator(train.len(), train.iter().map(|&i| y[i]));
            let y_test = DVector::from_iterator(test.len(), test.iter().map(|&i| y[i]));
            let beta = model
                .fit(&rows(x, &train), &y_train)
                .ok_or_else(|| EvaluationError::Scoring("singular gram matrix".to_string()))?;

            let residual = &y_test - rows(x, &test) * beta;
            let mean = y_test.mean();
            let total: f64 = y_test.iter().map(|v| (v - mean).powi(2)).sum();
            scores.push(1.0 - residual.norm_squared() / total);
        }
        Ok(scores.into())
    }
}

fn synthetic_dataset(rng: &mut StdRng) -> Result<Dataset, EvolutionError> {
    const SAMPLES: usize = 120;
    const FEATURES: usize = 12;

    let x = DMatrix::from_fn(SAMPLES, FEATURES, |_, _| rng.gen_range(-1.0..1.0));
    let y = DVector::from_fn(SAMPLES, |r, _| {
        3.0 * x[(r, 1)] - 2.0 * x[(r, 4)] + 1.5 * x[(r, 9)] + 0.1 * rng.gen_range(-1.0..1.0)
    });
    Dataset::new(x, y)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== Genetic Feature Selection ===\n");

    let mut rng = StdRng::seed_from_u64(42);
    let data = synthetic_dataset(&mut rng)?;

    let config = SelectionConfig {
        n_population: 60,
        n_generations: 30,
        n_gen_no_change: Some(8),
        max_features: Some(6),
        caching: true,
        n_jobs: -1,
        verbose: true,
        hparams: Some(
            HyperparameterSpec::new(6).with_param(Hyperparameter::real("alpha", 0.001, 10.0)),
        ),
        cv: CvSettings {
            strategy: CvStrategy::KFold { n_splits: 5 },
            ..CvSettings::default()
        },
        ..SelectionConfig::default()
    };

    let result = select_features(Ridge { alpha: 1.0 }, KFoldR2, &data, &config, &mut rng)?;

    println!("\nSearch complete!");
    println!("  Generations:   {}", result.generations);
    println!("  Evaluations:   {}", result.evaluations);
    if let Some(reason) = &result.termination_reason {
        println!("  Stopped:       {}", reason);
    }
    if let Some(stats) = &result.cache_stats {
        println!("  Cache:         {} hits, {} misses", stats.hits, stats.misses);
    }
    println!("\nBest candidate:");
    println!("  Features:      {:?}", result.candidate.selected_indices());
    println!("  Mean R²:       {:.4}", result.best_fitness.score());
    println!("  Dispersion:    {:.4}", result.best_fitness.dispersion());
    for (name, value) in &result.candidate.params {
        println!("  {:<14} {:?}", format!("{name}:"), value);
    }
    println!("\nBest score per generation: {:?}", result.logbook.generation_scores());

    Ok(())
}

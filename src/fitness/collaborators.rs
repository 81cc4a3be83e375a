//! Scoring collaborators
//!
//! The evaluator treats model fitting and cross-validation as opaque: it hands
//! a freshly configured model and the reduced design matrix to a
//! [`CrossValidator`] and gets per-fold scores back.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{EvaluationError, EvolutionError};
use crate::genome::hyperparams::ParamValue;

/// Training data shared by every evaluation of a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    x: DMatrix<f64>,
    y: DVector<f64>,
    groups: Option<Vec<usize>>,
}

impl Dataset {
    /// Create a dataset; `x` is samples by features
    pub fn new(x: DMatrix<f64>, y: DVector<f64>) -> Result<Self, EvolutionError> {
        if x.nrows() != y.len() {
            return Err(EvolutionError::Configuration(format!(
                "X has {} samples but y has {}",
                x.nrows(),
                y.len()
            )));
        }
        Ok(Self { x, y, groups: None })
    }

    /// Attach group labels for group-aware splitting
    pub fn with_groups(mut self, groups: Vec<usize>) -> Result<Self, EvolutionError> {
        if groups.len() != self.y.len() {
            return Err(EvolutionError::Configuration(format!(
                "groups has {} labels but there are {} samples",
                groups.len(),
                self.y.len()
            )));
        }
        self.groups = Some(groups);
        Ok(self)
    }

    /// Number of samples
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    /// Number of candidate features
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Full design matrix
    pub fn x(&self) -> &DMatrix<f64> {
        &self.x
    }

    /// Targets
    pub fn y(&self) -> &DVector<f64> {
        &self.y
    }

    /// Group labels, if any
    pub fn groups(&self) -> Option<&[usize]> {
        self.groups.as_deref()
    }

    /// Design matrix restricted to the given columns
    pub fn select_features(&self, columns: &[usize]) -> DMatrix<f64> {
        self.x.select_columns(columns)
    }
}

/// Cross-validation splitting strategy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CvStrategy {
    /// Plain k-fold
    KFold { n_splits: usize },
    /// Class-stratified k-fold
    StratifiedKFold { n_splits: usize },
    /// Group-aware k-fold, uses the dataset's group labels
    GroupKFold { n_splits: usize },
}

impl CvStrategy {
    /// Number of folds
    pub fn n_splits(&self) -> usize {
        match *self {
            Self::KFold { n_splits }
            | Self::StratifiedKFold { n_splits }
            | Self::GroupKFold { n_splits } => n_splits,
        }
    }
}

impl Default for CvStrategy {
    fn default() -> Self {
        Self::KFold { n_splits: 3 }
    }
}

/// Everything the scoring collaborator needs besides model and data
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvSettings {
    /// Splitting strategy
    pub strategy: CvStrategy,
    /// Scorer name (e.g. "accuracy", "roc_auc"); `None` uses the model's default
    pub scoring: Option<String>,
    /// Extra parameters forwarded to the model's fit
    pub fit_params: BTreeMap<String, serde_json::Value>,
}

/// Output of one cross-validation call
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CvOutcome {
    /// One score per fold
    pub fold_scores: Vec<f64>,
    /// Transient fit warnings (convergence and the like)
    pub warnings: Vec<String>,
}

impl From<Vec<f64>> for CvOutcome {
    fn from(fold_scores: Vec<f64>) -> Self {
        Self {
            fold_scores,
            warnings: Vec::new(),
        }
    }
}

/// A model template that can be configured and cloned per evaluation
pub trait Estimator: Clone + Send + Sync {
    /// Assign a hyperparameter by name
    fn set_hyperparameter(&mut self, name: &str, value: ParamValue) -> Result<(), EvaluationError>;
}

/// Cross-validation scoring collaborator
///
/// Must be deterministic for identical inputs, otherwise cached scores are
/// not reproducible.
pub trait CrossValidator<E: Estimator>: Send + Sync {
    /// Fit and score `estimator` on each fold
    fn cross_val_score(
        &self,
        estimator: &E,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        groups: Option<&[usize]>,
        settings: &CvSettings,
    ) -> Result<CvOutcome, EvaluationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_dataset() -> Dataset {
        let x = DMatrix::from_row_slice(3, 4, &[
            1.0, 2.0, 3.0, 4.0, //
            5.0, 6.0, 7.0, 8.0, //
            9.0, 10.0, 11.0, 12.0,
        ]);
        let y = DVector::from_vec(vec![0.0, 1.0, 0.0]);
        Dataset::new(x, y).unwrap()
    }

    #[test]
    fn test_dataset_shape() {
        let data = small_dataset();
        assert_eq!(data.n_samples(), 3);
        assert_eq!(data.n_features(), 4);
        assert!(data.groups().is_none());
    }

    #[test]
    fn test_dataset_shape_mismatch() {
        let x = DMatrix::zeros(3, 2);
        let y = DVector::zeros(4);
        assert!(matches!(
            Dataset::new(x, y),
            Err(EvolutionError::Configuration(_))
        ));
    }

    #[test]
    fn test_select_features() {
        let data = small_dataset();
        let reduced = data.select_features(&[1, 3]);
        assert_eq!(reduced.shape(), (3, 2));
        assert_eq!(reduced[(0, 0)], 2.0);
        assert_eq!(reduced[(2, 1)], 12.0);
    }

    #[test]
    fn test_groups() {
        let data = small_dataset().with_groups(vec![0, 0, 1]).unwrap();
        assert_eq!(data.groups(), Some(&[0, 0, 1][..]));
        assert!(small_dataset().with_groups(vec![0]).is_err());
    }

    #[test]
    fn test_cv_settings_json() {
        let json = r#"{
            "strategy": {"kind": "stratified_k_fold", "n_splits": 5},
            "scoring": "accuracy",
            "fit_params": {"sample_weight_scale": 2.0}
        }"#;
        let settings: CvSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.strategy.n_splits(), 5);
        assert_eq!(settings.scoring.as_deref(), Some("accuracy"));
        assert_eq!(settings.fit_params.len(), 1);
    }

    #[test]
    fn test_cv_settings_default() {
        let settings = CvSettings::default();
        assert_eq!(settings.strategy, CvStrategy::KFold { n_splits: 3 });
        assert!(settings.scoring.is_none());
    }
}

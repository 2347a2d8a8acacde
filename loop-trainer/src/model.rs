use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_stats::SummaryStatisticsExt;
use serde::{Deserialize, Serialize};

use super::config::ModelParams;
use super::errors::{EmptyTrainingError, FeatureContractError};
use super::features::PAIR_FEATURE_COLUMNS;

/// L2-regularized logistic regression over the standardized pairwise
/// feature matrix, fitted by batch gradient descent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub weights: Vec<f64>,
    pub bias: f64,
    pub feature_means: Vec<f64>,
    pub feature_stds: Vec<f64>,
    pub feature_columns: Vec<String>,
}

pub fn train_logistic(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    params: &ModelParams,
) -> Result<LogisticModel, EmptyTrainingError> {
    if x.nrows() == 0 {
        return Err(EmptyTrainingError);
    }

    let (means, stds) = column_stats(x);
    let xs = standardize(x, &means, &stds);
    let n = x.nrows() as f64;

    let mut weights = Array1::<f64>::zeros(x.ncols());
    let mut bias = 0.0;
    for iteration in 0..params.n_iters {
        let z = xs.dot(&weights) + bias;
        let prob = z.mapv(sigmoid);
        let resid = &prob - &y;

        let grad_w = xs.t().dot(&resid) / n + &weights * params.l2;
        let grad_b = resid.sum() / n;

        weights = weights - &grad_w * params.learning_rate;
        bias -= params.learning_rate * grad_b;

        let step = grad_w.mapv(|g| g * g).sum().sqrt() * params.learning_rate;
        trace!("update norm is {} on iteration {}", step, iteration);
        if step < params.tol {
            debug!("fit converged after {} iterations", iteration + 1);
            break;
        }
    }

    Ok(LogisticModel {
        weights: weights.to_vec(),
        bias,
        feature_means: means,
        feature_stds: stds,
        feature_columns: PAIR_FEATURE_COLUMNS.iter().map(|col| String::from(*col)).collect(),
    })
}

impl LogisticModel {
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Array1<f64> {
        let xs = standardize(x, &self.feature_means, &self.feature_stds);
        let weights = Array1::from(self.weights.clone());
        (xs.dot(&weights) + self.bias).mapv(sigmoid)
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<LogisticModel, Box<dyn Error>> {
        let file = File::open(path)?;
        let model: LogisticModel = serde_json::from_reader(BufReader::new(file))?;

        if model.feature_columns != PAIR_FEATURE_COLUMNS {
            let expected = PAIR_FEATURE_COLUMNS.iter().map(|col| String::from(*col)).collect();
            return Err(FeatureContractError::new(expected, model.feature_columns).into());
        }
        Ok(model)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn column_stats(x: ArrayView2<f64>) -> (Vec<f64>, Vec<f64>) {
    let mut means = Vec::with_capacity(x.ncols());
    let mut stds = Vec::with_capacity(x.ncols());

    for col in x.axis_iter(Axis(1)) {
        let mean = col.mean().unwrap_or(0.0);
        let std = col.central_moment(2).unwrap_or(0.0).sqrt();
        means.push(mean);
        // constant columns keep their raw scale
        stds.push(if std > 0.0 { std } else { 1.0 });
    }

    (means, stds)
}

fn standardize(x: ArrayView2<f64>, means: &[f64], stds: &[f64]) -> Array2<f64> {
    let mut xs = x.to_owned();
    for (j, mut col) in xs.axis_iter_mut(Axis(1)).enumerate() {
        let (mean, std) = (means[j], stds[j]);
        col.map_inplace(|v| *v = (*v - mean) / std);
    }
    xs
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use tempfile::TempDir;

    fn params() -> ModelParams {
        ModelParams { learning_rate: 0.5, l2: 0.0, n_iters: 2000, tol: 1e-9 }
    }

    fn separable_data() -> (Array2<f64>, Array1<f64>) {
        // positives carry uniformly larger signal on every column
        let mut x = Array2::<f64>::zeros((8, PAIR_FEATURE_COLUMNS.len()));
        let mut y = Array1::<f64>::zeros(8);
        for i in 0..8 {
            let level = if i < 4 { 5.0 } else { 1.0 };
            for j in 0..PAIR_FEATURE_COLUMNS.len() {
                x[[i, j]] = level + (i as f64) * 0.01 + (j as f64) * 0.1;
            }
            y[i] = if i < 4 { 1.0 } else { 0.0 };
        }
        (x, y)
    }

    #[test]
    fn test_fit_separates_classes() {
        let (x, y) = separable_data();
        let model = train_logistic(x.view(), y.view(), &params()).unwrap();

        let probs = model.predict_proba(x.view());
        for i in 0..probs.len() {
            if y[i] > 0.5 {
                assert!(probs[i] > 0.5, "positive row {} scored {}", i, probs[i]);
            } else {
                assert!(probs[i] < 0.5, "negative row {} scored {}", i, probs[i]);
            }
        }
    }

    #[test]
    fn test_empty_training_split_fails() {
        let x = Array2::<f64>::zeros((0, PAIR_FEATURE_COLUMNS.len()));
        let y = Array1::<f64>::zeros(0);
        assert!(train_logistic(x.view(), y.view(), &params()).is_err());
    }

    #[test]
    fn test_column_stats_guard_constant_columns() {
        let x = arr2(&[[1.0, 2.0], [1.0, 4.0]]);
        let (means, stds) = column_stats(x.view());
        assert_eq!(means, vec![1.0, 3.0]);
        assert_eq!(stds[0], 1.0);
        assert!(stds[1] > 0.0);
    }

    #[test]
    fn test_save_load_round_trip() {
        let (x, y) = separable_data();
        let model = train_logistic(x.view(), y.view(), &params()).unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        model.save(&path).unwrap();

        let loaded = LogisticModel::load(&path).unwrap();
        assert_eq!(loaded.weights, model.weights);
        assert_eq!(loaded.bias, model.bias);
        assert_eq!(loaded.feature_columns, PAIR_FEATURE_COLUMNS);
    }

    #[test]
    fn test_load_rejects_mismatched_feature_contract() {
        let (x, y) = separable_data();
        let mut model = train_logistic(x.view(), y.view(), &params()).unwrap();
        model.feature_columns = vec![String::from("distance_bp")];

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        model.save(&path).unwrap();

        let err = LogisticModel::load(&path).unwrap_err().to_string();
        assert!(err.contains("feature columns"));
    }
}

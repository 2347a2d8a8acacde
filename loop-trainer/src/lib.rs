pub mod config;
pub mod errors;
pub mod features;
pub mod metrics;
pub mod model;

use std::error::Error;
use std::fs::{self, File};
use std::path::Path;

use log::info;
use serde::Serialize;

use loop_pairs::{
    assign_binary_labels, build_positive_pair_set, generate_candidate_pairs, reader, BinTable,
};

use self::features::PairFeatures;
use self::metrics::{BinaryMetrics, MetricsReport};
use self::model::LogisticModel;

#[derive(Debug, Clone, Serialize)]
pub struct TrainingSummary {
    pub metrics: MetricsReport,
    pub model_path: String,
    pub metrics_path: String,
    pub features_path: String,
    pub resolved_config_path: String,
    pub n_train: usize,
    pub n_val: usize,
    pub n_test: usize,
}

pub fn run_training(config_path: &Path) -> Result<TrainingSummary, Box<dyn Error>> {
    info!("Starting training pipeline with config {}...", config_path.display());
    let cfg = config::load_config(config_path)?;

    let bin_features = reader::load_bin_features(Path::new(&cfg.paths.bin_features_path))?;
    let loops = reader::load_loops_bedpe(Path::new(&cfg.paths.loops_bedpe_path))?;

    let table = BinTable::from_bins(bin_features.iter().map(|bf| bf.bin.clone()).collect());
    let candidates = generate_candidate_pairs(&table, cfg.distance_min_bp, cfg.distance_max_bp);
    let positives = build_positive_pair_set(&loops, cfg.resolution_bp);
    let labeled = assign_binary_labels(candidates, &positives);

    let rows = features::build_pair_features(&labeled, &bin_features);
    let train_rows = features::subset_by_chroms(&rows, &cfg.split.train_chroms);
    let val_rows = features::subset_by_chroms(&rows, &cfg.split.val_chroms);
    let test_rows = features::subset_by_chroms(&rows, &cfg.split.test_chroms);
    info!(
        "Split sizes: {} train, {} val, {} test rows.",
        train_rows.len(),
        val_rows.len(),
        test_rows.len()
    );

    let (x_train, y_train) = features::to_design_matrix(&train_rows);
    let fitted = model::train_logistic(x_train.view(), y_train.view(), &cfg.params)?;

    let report = MetricsReport {
        val: evaluate_split(&fitted, &val_rows),
        test: evaluate_split(&fitted, &test_rows),
    };
    info!(
        "Validation roc_auc = {}, pr_auc = {}.",
        report.val.roc_auc, report.val.pr_auc
    );

    let out_dir = Path::new(&cfg.paths.output_dir);
    fs::create_dir_all(out_dir)?;

    let features_path = out_dir.join("features.tsv");
    features::write_feature_table(&features_path, &rows)?;

    let model_path = out_dir.join("model.json");
    fitted.save(&model_path)?;

    let metrics_path = out_dir.join("metrics.json");
    serde_json::to_writer_pretty(File::create(&metrics_path)?, &report)?;

    let resolved_config_path = out_dir.join("resolved_config.yaml");
    serde_yaml::to_writer(File::create(&resolved_config_path)?, &cfg)?;

    info!("Training pipeline is complete.");
    Ok(TrainingSummary {
        metrics: report,
        model_path: model_path.to_string_lossy().into_owned(),
        metrics_path: metrics_path.to_string_lossy().into_owned(),
        features_path: features_path.to_string_lossy().into_owned(),
        resolved_config_path: resolved_config_path.to_string_lossy().into_owned(),
        n_train: train_rows.len(),
        n_val: val_rows.len(),
        n_test: test_rows.len(),
    })
}

fn evaluate_split(fitted: &LogisticModel, rows: &[PairFeatures]) -> BinaryMetrics {
    let (x, y) = features::to_design_matrix(rows);
    let scores = fitted.predict_proba(x.view());
    metrics::evaluate_binary(scores.view(), y.view())
}

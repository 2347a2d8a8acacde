use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub bin_features_path: String,
    pub loops_bedpe_path: String,
    pub output_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    pub train_chroms: Vec<String>,
    pub val_chroms: Vec<String>,
    pub test_chroms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParams {
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_l2")]
    pub l2: f64,
    #[serde(default = "default_n_iters")]
    pub n_iters: usize,
    #[serde(default = "default_tol")]
    pub tol: f64,
}

fn default_learning_rate() -> f64 {
    0.1
}

fn default_l2() -> f64 {
    0.001
}

fn default_n_iters() -> usize {
    400
}

fn default_tol() -> f64 {
    1e-5
}

impl Default for ModelParams {
    fn default() -> ModelParams {
        ModelParams {
            learning_rate: default_learning_rate(),
            l2: default_l2(),
            n_iters: default_n_iters(),
            tol: default_tol(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub paths: PathsConfig,
    pub distance_min_bp: u64,
    pub distance_max_bp: u64,
    pub resolution_bp: u32,
    pub split: SplitConfig,
    #[serde(default)]
    pub params: ModelParams,
}

/// Load a config, following a single `extends: base.yaml` reference the
/// way the training configs are organized: the base document is loaded
/// first and the child overrides it, merging nested mappings one level
/// deep with child keys winning.
pub fn load_config(path: &Path) -> Result<TrainConfig, Box<dyn Error>> {
    let doc: Value = serde_yaml::from_reader(File::open(path)?)?;

    let doc = match extends_of(&doc) {
        Some(base_name) => {
            let base_path = base_path_for(path, &base_name);
            let base: Value = serde_yaml::from_reader(File::open(&base_path)?)?;
            merge_configs(base, doc)
        }
        None => doc,
    };

    let cfg: TrainConfig = serde_yaml::from_value(doc)?;
    Ok(cfg)
}

fn extends_of(doc: &Value) -> Option<String> {
    match doc {
        Value::Mapping(map) => map
            .get(&Value::String(String::from("extends")))
            .and_then(Value::as_str)
            .map(String::from),
        _ => None,
    }
}

fn base_path_for(path: &Path, base_name: &str) -> PathBuf {
    match path.parent() {
        Some(dir) => dir.join(base_name),
        None => PathBuf::from(base_name),
    }
}

fn merge_configs(base: Value, child: Value) -> Value {
    match (base, child) {
        (Value::Mapping(mut base_map), Value::Mapping(child_map)) => {
            for (key, child_val) in child_map {
                let merged = match (base_map.remove(&key), child_val) {
                    (Some(Value::Mapping(mut base_inner)), Value::Mapping(child_inner)) => {
                        for (inner_key, inner_val) in child_inner {
                            base_inner.insert(inner_key, inner_val);
                        }
                        Value::Mapping(base_inner)
                    }
                    (_, child_val) => child_val,
                };
                base_map.insert(key, merged);
            }
            Value::Mapping(base_map)
        }
        (_, child) => child,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const BASE_YAML: &str = "\
paths:
  bin_features_path: data/bins.tsv
  loops_bedpe_path: data/loops.bedpe
  output_dir: out
distance_min_bp: 20000
distance_max_bp: 2000000
resolution_bp: 10000
split:
  train_chroms: [chr1, chr2]
  val_chroms: [chr3]
  test_chroms: [chr4]
params:
  learning_rate: 0.05
  n_iters: 100
";

    #[test]
    fn test_load_plain_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("train.yaml");
        fs::write(&path, BASE_YAML).unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.distance_min_bp, 20000);
        assert_eq!(cfg.resolution_bp, 10000);
        assert_eq!(cfg.split.train_chroms, vec!["chr1", "chr2"]);
        assert_eq!(cfg.params.learning_rate, 0.05);
        assert_eq!(cfg.params.n_iters, 100);
        // unset params fall back to defaults
        assert_eq!(cfg.params.tol, 1e-5);
    }

    #[test]
    fn test_extends_overrides_scalars_and_merges_mappings() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("base.yaml"), BASE_YAML).unwrap();

        let child = "\
extends: base.yaml
resolution_bp: 5000
paths:
  output_dir: out_v2
params:
  learning_rate: 0.2
";
        let path = dir.path().join("child.yaml");
        fs::write(&path, child).unwrap();

        let cfg = load_config(&path).unwrap();
        // overridden by the child
        assert_eq!(cfg.resolution_bp, 5000);
        assert_eq!(cfg.paths.output_dir, "out_v2");
        assert_eq!(cfg.params.learning_rate, 0.2);
        // inherited from the base
        assert_eq!(cfg.distance_max_bp, 2000000);
        assert_eq!(cfg.paths.bin_features_path, "data/bins.tsv");
        assert_eq!(cfg.params.n_iters, 100);
    }

    #[test]
    fn test_missing_base_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("child.yaml");
        fs::write(&path, "extends: nowhere.yaml\n").unwrap();

        assert!(load_config(&path).is_err());
    }
}

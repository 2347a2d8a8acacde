use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use ahash::AHashMap;
use ascii::AsciiString;
use log::{debug, info};
use ndarray::{Array1, Array2};

use loop_pairs::{BinFeatures, LabeledPair};

/// Column order of the pairwise feature matrix. The model artifact pins
/// this list so stale models refuse freshly built tables.
pub const PAIR_FEATURE_COLUMNS: [&str; 9] = [
    "distance_bp",
    "atac_left",
    "h3k27ac_left",
    "atac_right",
    "h3k27ac_right",
    "atac_mean",
    "h3k27ac_mean",
    "atac_product",
    "h3k27ac_product",
];

#[derive(Debug, Clone)]
pub struct PairFeatures {
    pub chrom: AsciiString,
    pub bin_id_left: AsciiString,
    pub bin_id_right: AsciiString,
    pub label: u8,
    pub distance_bp: u64,
    pub atac_left: f64,
    pub h3k27ac_left: f64,
    pub atac_right: f64,
    pub h3k27ac_right: f64,
    pub atac_mean: f64,
    pub h3k27ac_mean: f64,
    pub atac_product: f64,
    pub h3k27ac_product: f64,
}

impl PairFeatures {
    pub fn feature_vector(&self) -> [f64; 9] {
        [
            self.distance_bp as f64,
            self.atac_left,
            self.h3k27ac_left,
            self.atac_right,
            self.h3k27ac_right,
            self.atac_mean,
            self.h3k27ac_mean,
            self.atac_product,
            self.h3k27ac_product,
        ]
    }
}

/// Join labeled pairs to per-bin signals by bin id. Pairs whose left or
/// right bin is absent from the signal table are dropped.
pub fn build_pair_features(labeled: &[LabeledPair], bins: &[BinFeatures]) -> Vec<PairFeatures> {
    let mut signal_by_id: AHashMap<AsciiString, (f64, f64)> = AHashMap::default();
    for bf in bins {
        signal_by_id.insert(bf.bin.id(), (bf.atac, bf.h3k27ac));
    }

    let mut rows = Vec::with_capacity(labeled.len());
    for lp in labeled {
        let left = match signal_by_id.get(&lp.pair.bin_id_left) {
            Some(signals) => *signals,
            None => continue,
        };
        let right = match signal_by_id.get(&lp.pair.bin_id_right) {
            Some(signals) => *signals,
            None => continue,
        };

        let (atac_left, h3k27ac_left) = left;
        let (atac_right, h3k27ac_right) = right;
        rows.push(PairFeatures {
            chrom: lp.pair.chrom.clone(),
            bin_id_left: lp.pair.bin_id_left.clone(),
            bin_id_right: lp.pair.bin_id_right.clone(),
            label: lp.label,
            distance_bp: lp.pair.distance_bp,
            atac_left,
            h3k27ac_left,
            atac_right,
            h3k27ac_right,
            atac_mean: (atac_left + atac_right) / 2.0,
            h3k27ac_mean: (h3k27ac_left + h3k27ac_right) / 2.0,
            atac_product: atac_left * atac_right,
            h3k27ac_product: h3k27ac_left * h3k27ac_right,
        });
    }

    let n_dropped = labeled.len() - rows.len();
    if n_dropped > 0 {
        debug!("{} labeled pairs were dropped without matching bin signals", n_dropped);
    }
    info!("{} pairwise feature rows were built.", rows.len());
    rows
}

pub fn subset_by_chroms(rows: &[PairFeatures], chroms: &[String]) -> Vec<PairFeatures> {
    rows.iter()
        .filter(|row| chroms.iter().any(|chrom| row.chrom.as_str() == chrom))
        .cloned()
        .collect()
}

pub fn to_design_matrix(rows: &[PairFeatures]) -> (Array2<f64>, Array1<f64>) {
    let mut x = Array2::<f64>::zeros((rows.len(), PAIR_FEATURE_COLUMNS.len()));
    let mut y = Array1::<f64>::zeros(rows.len());

    for (i, row) in rows.iter().enumerate() {
        for (j, value) in row.feature_vector().iter().enumerate() {
            x[[i, j]] = *value;
        }
        y[i] = row.label as f64;
    }

    (x, y)
}

pub fn write_feature_table(path: &Path, rows: &[PairFeatures]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut wrtr = BufWriter::new(file);

    writeln!(
        wrtr,
        "chrom\tbin_id_left\tbin_id_right\t{}\tlabel",
        PAIR_FEATURE_COLUMNS.join("\t")
    )?;
    for row in rows {
        let values: Vec<String> = row.feature_vector().iter().map(|v| v.to_string()).collect();
        writeln!(
            wrtr,
            "{}\t{}\t{}\t{}\t{}",
            row.chrom,
            row.bin_id_left,
            row.bin_id_right,
            values.join("\t"),
            row.label
        )?;
    }
    wrtr.flush()?;

    info!("{} feature rows were saved into {}.", rows.len(), path.display());
    Ok(())
}

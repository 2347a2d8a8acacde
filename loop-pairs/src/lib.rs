pub mod bins;
pub mod candidates;
pub mod errors;
pub mod labels;
pub mod reader;
pub mod writer;

use std::error::Error;
use std::path::Path;

use log::info;

pub use self::bins::{make_bin_id, Bin, BinFeatures, BinTable};
pub use self::candidates::{generate_candidate_pairs, CandidatePair};
pub use self::labels::{
    assign_binary_labels, binize_anchor, build_positive_pair_set, LabeledPair, LoopAnchors,
    PositiveKey,
};

pub fn write_candidate_pairs(
    bins_file: &Path,
    out_file: &Path,
    distance_min_bp: u64,
    distance_max_bp: u64,
) -> Result<(), Box<dyn Error>> {
    info!("Starting candidate pair generation...");
    let bin_features = reader::load_bin_features(bins_file)?;
    let table = BinTable::from_bins(bin_features.into_iter().map(|bf| bf.bin).collect());

    let pairs = generate_candidate_pairs(&table, distance_min_bp, distance_max_bp);
    writer::write_candidate_table(out_file, &pairs)?;
    info!("Candidate pair generation is complete.");
    Ok(())
}

pub fn write_labeled_pairs(
    bins_file: &Path,
    loops_file: &Path,
    out_file: &Path,
    distance_min_bp: u64,
    distance_max_bp: u64,
    resolution_bp: u32,
) -> Result<(), Box<dyn Error>> {
    info!("Starting candidate pair labeling...");
    let bin_features = reader::load_bin_features(bins_file)?;
    let loops = reader::load_loops_bedpe(loops_file)?;
    let table = BinTable::from_bins(bin_features.into_iter().map(|bf| bf.bin).collect());

    let pairs = generate_candidate_pairs(&table, distance_min_bp, distance_max_bp);
    let positives = build_positive_pair_set(&loops, resolution_bp);
    let labeled = assign_binary_labels(pairs, &positives);

    writer::write_labeled_table(out_file, &labeled)?;
    info!("Candidate pair labeling is complete.");
    Ok(())
}

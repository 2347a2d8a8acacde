use ahash::AHashSet;
use ascii::{AsciiStr, AsciiString};
use log::{debug, info};

use super::bins::make_bin_id;
use super::candidates::CandidatePair;

/// Anchor coordinates of one observed loop. Inter-chromosomal records are
/// kept at load time and skipped during positive-set construction.
#[derive(Debug, Clone)]
pub struct LoopAnchors {
    pub chrom1: AsciiString,
    pub start1: u64,
    pub end1: u64,
    pub chrom2: AsciiString,
    pub start2: u64,
    pub end2: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositiveKey {
    pub chrom: AsciiString,
    pub bin_id_a: AsciiString,
    pub bin_id_b: AsciiString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledPair {
    pub pair: CandidatePair,
    pub label: u8,
}

fn anchor_bin_start(start: u64, end: u64, resolution_bp: u64) -> u64 {
    ((start + end) / 2 / resolution_bp) * resolution_bp
}

/// Map a continuous anchor interval onto the bin grid at the given
/// resolution. Uses the same floor-midpoint convention as Bin::mid, so
/// binized anchors line up with candidate bin ids exactly.
pub fn binize_anchor(chrom: &AsciiStr, start: u64, end: u64, resolution_bp: u32) -> AsciiString {
    let rsltn = resolution_bp as u64;
    let bstart = anchor_bin_start(start, end, rsltn);
    make_bin_id(chrom, bstart, bstart + rsltn)
}

/// Collapse loops into canonical positive keys. Anchors are ordered by
/// binned start, which is the same left/right order the candidate
/// generator emits for bins of one chromosome.
pub fn build_positive_pair_set(loops: &[LoopAnchors], resolution_bp: u32) -> AHashSet<PositiveKey> {
    info!("Building positive pair set from {} loops at {} bp...", loops.len(), resolution_bp);
    let rsltn = resolution_bp as u64;

    let mut positives = AHashSet::default();
    let mut n_inter: u64 = 0;
    for lp in loops {
        if lp.chrom1 != lp.chrom2 {
            n_inter += 1;
            continue;
        }

        let bstart1 = anchor_bin_start(lp.start1, lp.end1, rsltn);
        let bstart2 = anchor_bin_start(lp.start2, lp.end2, rsltn);
        let (left, right) = if bstart1 <= bstart2 { (bstart1, bstart2) } else { (bstart2, bstart1) };

        positives.insert(PositiveKey {
            chrom: lp.chrom1.clone(),
            bin_id_a: make_bin_id(&lp.chrom1, left, left + rsltn),
            bin_id_b: make_bin_id(&lp.chrom1, right, right + rsltn),
        });
    }

    if n_inter > 0 {
        debug!("{} inter-chromosomal loops were skipped", n_inter);
    }
    info!("{} positive pair keys were built.", positives.len());
    positives
}

/// Total over any candidate sequence: label is 1 on an exact key match,
/// 0 otherwise. Near-miss bins stay negative.
pub fn assign_binary_labels(
    candidates: Vec<CandidatePair>,
    positives: &AHashSet<PositiveKey>,
) -> Vec<LabeledPair> {
    let labeled: Vec<LabeledPair> = candidates
        .into_iter()
        .map(|cnd| {
            let key = PositiveKey {
                chrom: cnd.chrom.clone(),
                bin_id_a: cnd.bin_id_left.clone(),
                bin_id_b: cnd.bin_id_right.clone(),
            };
            let label = if positives.contains(&key) { 1 } else { 0 };
            LabeledPair { pair: cnd, label }
        })
        .collect();

    let n_positive: u64 = labeled.iter().map(|lp| lp.label as u64).sum();
    info!("{} of {} candidate pairs were labeled positive.", n_positive, labeled.len());
    labeled
}

use ascii::AsciiString;
use log::{debug, info};

use super::bins::BinTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePair {
    pub chrom: AsciiString,
    pub bin_id_left: AsciiString,
    pub bin_id_right: AsciiString,
    pub distance_bp: u64,
}

/// Enumerate intra-chromosomal bin pairs whose midpoint distance falls in
/// [distance_min_bp, distance_max_bp], both ends inclusive. Callers must
/// ensure distance_min_bp <= distance_max_bp. Bins with end > start and no
/// overlaps keep midpoints non-decreasing along each partition, which is
/// what makes the early break below valid.
pub fn generate_candidate_pairs(
    table: &BinTable,
    distance_min_bp: u64,
    distance_max_bp: u64,
) -> Vec<CandidatePair> {
    info!(
        "Generating candidate pairs within [{}, {}] bp over {} bins...",
        distance_min_bp,
        distance_max_bp,
        table.n_bins()
    );

    let mut pairs = Vec::new();
    for (chrom, bins) in table.partitions() {
        let mids: Vec<u64> = bins.iter().map(|bin| bin.mid()).collect();
        let ids: Vec<AsciiString> = bins.iter().map(|bin| bin.id()).collect();

        let before = pairs.len();
        for i in 0..bins.len() {
            for j in (i + 1)..bins.len() {
                let dist = mids[j] - mids[i];
                if dist < distance_min_bp {
                    continue;
                }
                if dist > distance_max_bp {
                    // midpoints only grow with j, so no later j can qualify
                    break;
                }
                pairs.push(CandidatePair {
                    chrom: chrom.clone(),
                    bin_id_left: ids[i].clone(),
                    bin_id_right: ids[j].clone(),
                    distance_bp: dist,
                });
            }
        }
        debug!("{}: {} candidate pairs", chrom, pairs.len() - before);
    }

    info!("{} candidate pairs were generated.", pairs.len());
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bins::Bin;

    fn asc(s: &str) -> AsciiString {
        AsciiString::from_ascii(s).unwrap()
    }

    fn table(coords: &[(&str, u64, u64)]) -> BinTable {
        BinTable::from_bins(
            coords.iter().map(|(c, s, e)| Bin::new(asc(c), *s, *e)).collect(),
        )
    }

    #[test]
    fn test_distance_window_with_early_break() {
        // mids are 500, 1500, 3500; distances are 1000, 2000, 3000
        let bins = table(&[("chr1", 0, 1000), ("chr1", 1000, 2000), ("chr1", 3000, 4000)]);
        let pairs = generate_candidate_pairs(&bins, 1500, 3500);

        assert_eq!(pairs.len(), 2);
        let mut dists: Vec<u64> = pairs.iter().map(|p| p.distance_bp).collect();
        dists.sort();
        assert_eq!(dists, vec![2000, 3000]);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let bins = table(&[("chr1", 0, 1000), ("chr1", 1000, 2000), ("chr1", 2000, 3000)]);

        let pairs = generate_candidate_pairs(&bins, 1000, 2000);
        assert_eq!(pairs.len(), 3);

        let exact = generate_candidate_pairs(&bins, 1000, 1000);
        assert_eq!(exact.len(), 2);
        assert!(exact.iter().all(|p| p.distance_bp == 1000));
    }

    #[test]
    fn test_left_bin_precedes_right_bin() {
        let bins = table(&[("chr1", 1000, 2000), ("chr1", 0, 1000)]);
        let pairs = generate_candidate_pairs(&bins, 0, 10_000);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].bin_id_left.as_str(), "chr1:0-1000");
        assert_eq!(pairs[0].bin_id_right.as_str(), "chr1:1000-2000");
        assert_eq!(pairs[0].distance_bp, 1000);
    }

    #[test]
    fn test_no_cross_chromosome_pairs() {
        let bins = table(&[
            ("chr1", 0, 1000),
            ("chr1", 1000, 2000),
            ("chr2", 0, 1000),
            ("chr2", 1000, 2000),
        ]);
        let pairs = generate_candidate_pairs(&bins, 0, 10_000);

        assert_eq!(pairs.len(), 2);
        for pair in &pairs {
            let chrom = format!("{}:", pair.chrom);
            assert!(pair.bin_id_left.as_str().starts_with(&chrom));
            assert!(pair.bin_id_right.as_str().starts_with(&chrom));
        }
    }

    #[test]
    fn test_empty_and_single_bin_inputs() {
        let none = generate_candidate_pairs(&table(&[]), 0, 1000);
        assert!(none.is_empty());

        let single = generate_candidate_pairs(&table(&[("chr1", 0, 1000)]), 0, 1000);
        assert!(single.is_empty());
    }

    #[test]
    fn test_generation_is_idempotent() {
        let bins = table(&[
            ("chr1", 0, 1000),
            ("chr1", 1000, 2000),
            ("chr1", 2000, 3000),
            ("chr2", 0, 1000),
            ("chr2", 5000, 6000),
        ]);
        let first = generate_candidate_pairs(&bins, 500, 6000);
        let second = generate_candidate_pairs(&bins, 500, 6000);
        assert_eq!(first, second);
    }
}

use ahash::AHashMap;
use ascii::{AsciiStr, AsciiString};
use itertools::Itertools;

/// Canonical bin identifier used as a join key across all tables.
pub fn make_bin_id(chrom: &AsciiStr, start: u64, end: u64) -> AsciiString {
    AsciiString::from_ascii(format!("{}:{}-{}", chrom, start, end)).unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bin {
    pub chrom: AsciiString,
    pub start: u64,
    pub end: u64,
}

impl Bin {
    pub fn new(chrom: AsciiString, start: u64, end: u64) -> Bin {
        Bin { chrom, start, end }
    }

    pub fn mid(&self) -> u64 {
        (self.start + self.end) / 2
    }

    pub fn id(&self) -> AsciiString {
        make_bin_id(&self.chrom, self.start, self.end)
    }
}

/// One row of the bin feature table: a bin plus its signal values.
#[derive(Debug, Clone)]
pub struct BinFeatures {
    pub bin: Bin,
    pub atac: f64,
    pub h3k27ac: f64,
}

/// Bins sorted by (chrom, start, end) and partitioned per chromosome.
/// Partitions keep the order in which chromosomes appear after sorting.
#[derive(Debug)]
pub struct BinTable {
    chrom_order: Vec<AsciiString>,
    bins_by_chrom: AHashMap<AsciiString, Vec<Bin>>,
}

impl BinTable {
    pub fn from_bins(mut bins: Vec<Bin>) -> BinTable {
        bins.sort_by(|a, b| {
            a.chrom.cmp(&b.chrom).then(a.start.cmp(&b.start)).then(a.end.cmp(&b.end))
        });

        let mut chrom_order = Vec::new();
        let mut bins_by_chrom: AHashMap<AsciiString, Vec<Bin>> = AHashMap::default();
        for (chrom, grp) in &bins.into_iter().group_by(|bin| bin.chrom.clone()) {
            chrom_order.push(chrom.clone());
            bins_by_chrom.insert(chrom, grp.collect());
        }

        BinTable { chrom_order, bins_by_chrom }
    }

    pub fn partitions(&self) -> impl Iterator<Item = (&AsciiString, &[Bin])> + '_ {
        self.chrom_order.iter().map(move |chrom| (chrom, self.bins_by_chrom[chrom].as_slice()))
    }

    pub fn n_chroms(&self) -> usize {
        self.chrom_order.len()
    }

    pub fn n_bins(&self) -> usize {
        self.bins_by_chrom.values().map(|bins| bins.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asc(s: &str) -> AsciiString {
        AsciiString::from_ascii(s).unwrap()
    }

    #[test]
    fn test_make_bin_id_formatting() {
        let id = make_bin_id(&asc("chr1"), 0, 1000);
        assert_eq!(id.as_str(), "chr1:0-1000");
    }

    #[test]
    fn test_bin_mid_floors() {
        assert_eq!(Bin::new(asc("chr1"), 0, 1000).mid(), 500);
        assert_eq!(Bin::new(asc("chr1"), 0, 1001).mid(), 500);
        assert_eq!(Bin::new(asc("chr1"), 1, 1002).mid(), 501);
    }

    #[test]
    fn test_bin_table_sorts_and_partitions() {
        let bins = vec![
            Bin::new(asc("chr2"), 0, 1000),
            Bin::new(asc("chr1"), 1000, 2000),
            Bin::new(asc("chr1"), 0, 1000),
        ];
        let table = BinTable::from_bins(bins);

        assert_eq!(table.n_chroms(), 2);
        assert_eq!(table.n_bins(), 3);

        let parts: Vec<(&AsciiString, &[Bin])> = table.partitions().collect();
        assert_eq!(parts[0].0.as_str(), "chr1");
        assert_eq!(parts[0].1[0].start, 0);
        assert_eq!(parts[0].1[1].start, 1000);
        assert_eq!(parts[1].0.as_str(), "chr2");
        assert_eq!(parts[1].1.len(), 1);
    }

    #[test]
    fn test_bin_table_empty() {
        let table = BinTable::from_bins(Vec::new());
        assert_eq!(table.n_chroms(), 0);
        assert_eq!(table.partitions().count(), 0);
    }
}

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;

use super::candidates::CandidatePair;
use super::labels::LabeledPair;

pub fn write_candidate_table(path: &Path, pairs: &[CandidatePair]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut wrtr = BufWriter::new(file);

    writeln!(wrtr, "chrom\tbin_id_left\tbin_id_right\tdistance_bp")?;
    for pair in pairs {
        writeln!(
            wrtr,
            "{}\t{}\t{}\t{}",
            pair.chrom, pair.bin_id_left, pair.bin_id_right, pair.distance_bp
        )?;
    }
    wrtr.flush()?;

    info!("{} candidate pairs were saved into {}.", pairs.len(), path.display());
    Ok(())
}

pub fn write_labeled_table(path: &Path, labeled: &[LabeledPair]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut wrtr = BufWriter::new(file);

    writeln!(wrtr, "chrom\tbin_id_left\tbin_id_right\tdistance_bp\tlabel")?;
    for lp in labeled {
        writeln!(
            wrtr,
            "{}\t{}\t{}\t{}\t{}",
            lp.pair.chrom, lp.pair.bin_id_left, lp.pair.bin_id_right, lp.pair.distance_bp, lp.label
        )?;
    }
    wrtr.flush()?;

    info!("{} labeled pairs were saved into {}.", labeled.len(), path.display());
    Ok(())
}

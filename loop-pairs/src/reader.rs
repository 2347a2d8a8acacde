use std::error::Error;
use std::fs::File;
use std::io;
use std::path::Path;

use ascii::{AsAsciiStr, AsciiString};
use log::info;
use serde::Deserialize;

use super::bins::{Bin, BinFeatures};
use super::errors::{SchemaError, TooFewColumnsError, UnsupportedTableError};
use super::labels::LoopAnchors;

pub const BIN_FEATURE_COLUMNS: [&str; 5] = ["chrom", "start", "end", "atac", "h3k27ac"];
pub const LOOP_ANCHOR_COLUMNS: [&str; 6] =
    ["chrom1", "start1", "end1", "chrom2", "start2", "end2"];

#[derive(Debug, Deserialize)]
struct BinFeatureRow {
    chrom: String,
    start: u64,
    end: u64,
    atac: f64,
    h3k27ac: f64,
}

fn delimiter_for(path: &Path) -> Result<u8, UnsupportedTableError> {
    let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("tsv") | Some("bed") | Some("bedpe") => Ok(b'\t'),
        Some("csv") => Ok(b','),
        _ => Err(UnsupportedTableError::new(&path.to_string_lossy())),
    }
}

pub fn load_bin_features(path: &Path) -> Result<Vec<BinFeatures>, Box<dyn Error>> {
    info!("Loading bin features from {}...", path.display());
    let delimiter = delimiter_for(path)?;
    let file = File::open(path)?;

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .comment(Some(b'#'))
        .from_reader(file);

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = BIN_FEATURE_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| String::from(*col))
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError::new("bin feature table", missing).into());
    }

    let mut features = Vec::new();
    for record in rdr.deserialize() {
        let row: BinFeatureRow = record?;
        let chrom = AsciiString::from(row.chrom.as_ascii_str()?);
        features.push(BinFeatures {
            bin: Bin::new(chrom, row.start, row.end),
            atac: row.atac,
            h3k27ac: row.h3k27ac,
        });
    }

    info!("{} bins were loaded.", features.len());
    Ok(features)
}

pub fn load_loops_bedpe(path: &Path) -> Result<Vec<LoopAnchors>, Box<dyn Error>> {
    info!("Loading loop anchors from {}...", path.display());
    let delimiter = delimiter_for(path)?;
    let file = File::open(path)?;

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(file);

    let mut loops = Vec::new();
    let mut columns: Option<[usize; 6]> = None;
    for result in rdr.records() {
        let record = result?;
        let cols = match columns {
            Some(cols) => cols,
            None => {
                let (cols, is_header) = resolve_anchor_columns(&record)?;
                columns = Some(cols);
                if is_header {
                    continue;
                }
                cols
            }
        };
        loops.push(parse_loop_record(&record, &cols)?);
    }

    info!("{} loop records were loaded.", loops.len());
    Ok(loops)
}

// A header is only recognized when all six anchor columns are named;
// otherwise the first six columns are used positionally and the first
// record already counts as data.
fn resolve_anchor_columns(
    record: &csv::StringRecord,
) -> Result<([usize; 6], bool), Box<dyn Error>> {
    let mut by_name = [0usize; 6];
    let mut found = 0;
    for (idx, field) in record.iter().enumerate() {
        if let Some(pos) = LOOP_ANCHOR_COLUMNS.iter().position(|col| *col == field) {
            by_name[pos] = idx;
            found += 1;
        }
    }

    if found == LOOP_ANCHOR_COLUMNS.len() {
        return Ok((by_name, true));
    }
    if record.len() < LOOP_ANCHOR_COLUMNS.len() {
        return Err(TooFewColumnsError::new(LOOP_ANCHOR_COLUMNS.len(), record.len()).into());
    }
    Ok(([0, 1, 2, 3, 4, 5], false))
}

fn parse_loop_record(
    record: &csv::StringRecord,
    cols: &[usize; 6],
) -> Result<LoopAnchors, Box<dyn Error>> {
    if record.len() < LOOP_ANCHOR_COLUMNS.len() {
        return Err(TooFewColumnsError::new(LOOP_ANCHOR_COLUMNS.len(), record.len()).into());
    }

    let line = record.position().map(|p| p.line()).unwrap_or(0);
    Ok(LoopAnchors {
        chrom1: AsciiString::from(get_field(record, cols[0])?.as_ascii_str()?),
        start1: parse_coord(get_field(record, cols[1])?, line)?,
        end1: parse_coord(get_field(record, cols[2])?, line)?,
        chrom2: AsciiString::from(get_field(record, cols[3])?.as_ascii_str()?),
        start2: parse_coord(get_field(record, cols[4])?, line)?,
        end2: parse_coord(get_field(record, cols[5])?, line)?,
    })
}

fn get_field(record: &csv::StringRecord, idx: usize) -> Result<&str, io::Error> {
    record.get(idx).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Loop record is missing column {}", idx + 1),
        )
    })
}

fn parse_coord(value: &str, line: u64) -> Result<u64, io::Error> {
    value.trim().parse().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line {}: cannot parse coordinate '{}' as an integer", line, value),
        )
    })
}

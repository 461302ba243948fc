use std::ffi::OsString;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use super::model::IntensityRecord;
use crate::error::{AnalysisError, AnalysisResult};

/// Column names written in the header comment.
pub const COLUMNS: [&str; 2] = ["channel1_intensity_", "channel2_intensity_"];

/// One data line: normalized means of the two signal channels.
#[derive(Debug, Serialize)]
struct AverageRow {
    channel1: String,
    channel2: String,
}

/// Output path for an input folder: the folder path text with `suffix`
/// appended verbatim (`data/run1` → `data/run1_averages1.csv`).
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Write the normalized intensities of `record` to `path`, replacing any
/// existing file.
///
/// Rows go to a temporary file next to `path` that is renamed into place
/// once complete, so a failed write never leaves a truncated file behind.
pub fn write_averages(path: &Path, record: &IntensityRecord) -> AnalysisResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| AnalysisError::io(dir, e))?;

    write_averages_to(BufWriter::new(staged.as_file_mut()), record).map_err(|source| {
        AnalysisError::Csv {
            path: path.to_path_buf(),
            source,
        }
    })?;

    staged
        .persist(path)
        .map_err(|e| AnalysisError::io(path, e.error))?;
    Ok(())
}

/// Write a `# a,b` header comment followed by one space-separated row per
/// sample.
pub fn write_averages_to<W: Write>(mut out: W, record: &IntensityRecord) -> csv::Result<()> {
    writeln!(out, "# {}", COLUMNS.join(","))?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    for (&a, &b) in record.normalized_a().iter().zip(record.normalized_b()) {
        writer.serialize(AverageRow {
            channel1: format_scientific(a),
            channel2: format_scientific(b),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Scientific notation with 18 fractional digits and a signed exponent of at
/// least two digits, e.g. `2.000000000000000000e+01`.
pub fn format_scientific(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let formatted = format!("{value:.18e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}

/// Bundled sample dataset, used when no path is given on the command line.
/// Populate it with `cargo run --bin generate_sample`.
pub const DEFAULT_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/foxa2-localized/");

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Case-sensitive filename suffix of channel images.
    pub extension: String,
    /// Number of leading characters forming the sample key.
    pub key_len: usize,
    /// Channel files a sample needs before it is analyzed.
    pub expected_channels: usize,
    /// Appended to the input path to name the output file.
    pub output_suffix: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extension: ".TIF".to_string(),
            key_len: 11,
            expected_channels: 4,
            output_suffix: "_averages1.csv".to_string(),
        }
    }
}

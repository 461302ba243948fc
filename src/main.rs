mod config;
mod data;
mod error;
mod pipeline;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};

use config::{AnalysisConfig, DEFAULT_DATA_DIR};

/// Reads images with fluorescent staining and analyzes fluorescent intensity
/// of each channel.
#[derive(Debug, Parser)]
#[command(name = "stain-intensity", version)]
struct Cli {
    /// Directory holding the channel images (*.TIF) to analyze
    #[arg(short = 'p', long = "path_data_file", default_value = DEFAULT_DATA_DIR)]
    path_data_file: PathBuf,
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Success = 0,
    /// An image could not be decoded or channels did not line up.
    InvalidData = 1,
    NoSuchDirectory = 2,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        ExitCode::from(status as u8)
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    execute(&cli, &AnalysisConfig::default()).into()
}

fn execute(cli: &Cli, config: &AnalysisConfig) -> Status {
    let path = cli.path_data_file.as_path();
    if !path.is_dir() {
        eprintln!("WARNING:  No such directory: {}", path.display());
        eprintln!("{}", Cli::command().render_help());
        return Status::NoSuchDirectory;
    }

    match analyze_folder(path, config) {
        Ok(output) => {
            println!("Wrote file: {}", output.display());
            Status::Success
        }
        Err(e) => {
            log::error!("Analysis failed: {e:#}");
            eprintln!("ERROR: {e:#}");
            Status::InvalidData
        }
    }
}

fn analyze_folder(path: &Path, config: &AnalysisConfig) -> anyhow::Result<PathBuf> {
    let summary = pipeline::run(path, config)
        .with_context(|| format!("analyzing images in {}", path.display()))?;
    if !summary.report.skipped.is_empty() {
        log::info!(
            "{} sample(s) lacked {} channel images and were left out",
            summary.report.skipped.len(),
            config.expected_channels
        );
    }
    Ok(summary.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn default_path_is_bundled_sample_data() {
        let cli = Cli::try_parse_from(["stain-intensity"]).unwrap();
        assert_eq!(cli.path_data_file, PathBuf::from(DEFAULT_DATA_DIR));
        assert!(cli.path_data_file.ends_with("data/foxa2-localized"));
    }

    #[test]
    fn short_and_long_flags() {
        let short = Cli::try_parse_from(["stain-intensity", "-p", "some/dir"]).unwrap();
        let long = Cli::try_parse_from(["stain-intensity", "--path_data_file", "some/dir"]).unwrap();
        assert_eq!(short.path_data_file, PathBuf::from("some/dir"));
        assert_eq!(long.path_data_file, short.path_data_file);
        assert!(Cli::try_parse_from(["stain-intensity", "--other", "x"]).is_err());
    }

    #[test]
    fn missing_directory_exits_with_2_and_no_output() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("absent");
        let args = [OsStr::new("stain-intensity"), OsStr::new("-p"), missing.as_os_str()];
        let cli = Cli::try_parse_from(args).unwrap();

        let status = execute(&cli, &AnalysisConfig::default());
        assert_eq!(status, Status::NoSuchDirectory);
        assert_eq!(status as u8, 2);
        assert!(!root.path().join("absent_averages1.csv").exists());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn empty_directory_succeeds_with_header_only() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("empty");
        std::fs::create_dir(&dir).unwrap();
        let cli = Cli {
            path_data_file: dir.clone(),
        };

        assert_eq!(execute(&cli, &AnalysisConfig::default()), Status::Success);
        let text = std::fs::read_to_string(root.path().join("empty_averages1.csv")).unwrap();
        assert_eq!(text, "# channel1_intensity_,channel2_intensity_\n");
    }

    #[test]
    fn corrupt_channel_is_invalid_data() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("bad");
        std::fs::create_dir(&dir).unwrap();
        for name in ["s0001_plateA405.TIF", "s0001_plateA488.TIF", "s0001_plateA561.TIF", "s0001_plateAbf.TIF"] {
            std::fs::write(dir.join(name), b"nope").unwrap();
        }
        let cli = Cli {
            path_data_file: dir,
        };

        assert_eq!(execute(&cli, &AnalysisConfig::default()), Status::InvalidData);
        assert!(!root.path().join("bad_averages1.csv").exists());
    }
}

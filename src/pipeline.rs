use std::path::{Path, PathBuf};

use crate::config::AnalysisConfig;
use crate::data::analysis::analyze;
use crate::data::export::{output_path, write_averages};
use crate::data::group::group_by_key;
use crate::data::loader::list_images;
use crate::data::model::AnalysisReport;
use crate::error::AnalysisResult;

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub output: PathBuf,
    pub report: AnalysisReport,
}

/// Analyze every complete sample in `folder` and write the averages file.
///
/// Nothing is written unless listing and analysis both succeed.
pub fn run(folder: &Path, config: &AnalysisConfig) -> AnalysisResult<RunSummary> {
    let names = list_images(folder, &config.extension)?;
    log::info!("Found {} {} file(s) in {}", names.len(), config.extension, folder.display());
    log::debug!("Files: {names:?}");

    let groups = group_by_key(&names, config.key_len);
    let report = analyze(folder, &groups, config)?;
    for (i, key) in report.analyzed.iter().enumerate() {
        let record = &report.record;
        log::info!(
            "{key}: raw {:.3} / {:.3}, normalized {:.3} / {:.3}",
            record.raw_a()[i],
            record.raw_b()[i],
            record.normalized_a()[i],
            record.normalized_b()[i]
        );
    }

    if report.record.is_empty() {
        log::warn!("No complete samples in {}, writing header only", folder.display());
    }

    let output = output_path(folder, &config.output_suffix);
    write_averages(&output, &report.record)?;
    log::info!("Wrote {} row(s) to {}", report.record.len(), output.display());

    Ok(RunSummary { output, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use image::GrayImage;

    fn write_tiff(dir: &Path, name: &str, pixels: Vec<u8>) {
        GrayImage::from_raw(pixels.len() as u32, 1, pixels)
            .unwrap()
            .save_with_format(dir.join(name), image::ImageFormat::Tiff)
            .unwrap();
    }

    fn data_dir(root: &Path) -> PathBuf {
        let dir = root.join("plate");
        std::fs::create_dir(&dir).unwrap();
        dir
    }

    #[test]
    fn complete_sample_gives_one_row() {
        let root = tempfile::tempdir().unwrap();
        let dir = data_dir(root.path());
        write_tiff(&dir, "sample0001_405.TIF", vec![1, 1, 1]);
        write_tiff(&dir, "sample0001_488.TIF", vec![10, 20, 30]);
        write_tiff(&dir, "sample0001_561.TIF", vec![2, 4, 6]);
        write_tiff(&dir, "sample0001_brightfield.TIF", vec![9, 9, 9]);

        let summary = run(&dir, &AnalysisConfig::default()).unwrap();
        assert_eq!(summary.output, root.path().join("plate_averages1.csv"));
        assert_eq!(summary.report.analyzed, vec!["sample0001_"]);

        let text = std::fs::read_to_string(&summary.output).unwrap();
        assert_eq!(
            text,
            "# channel1_intensity_,channel2_intensity_\n\
             2.000000000000000000e+01 4.000000000000000000e+00\n"
        );
    }

    #[test]
    fn incomplete_sample_gives_header_only() {
        let root = tempfile::tempdir().unwrap();
        let dir = data_dir(root.path());
        write_tiff(&dir, "sample0001_405.TIF", vec![1]);
        write_tiff(&dir, "sample0001_488.TIF", vec![1]);
        write_tiff(&dir, "sample0001_561.TIF", vec![1]);

        let summary = run(&dir, &AnalysisConfig::default()).unwrap();
        assert!(summary.report.record.is_empty());
        assert_eq!(summary.report.skipped, vec![("sample0001_".to_string(), 3)]);
        let text = std::fs::read_to_string(&summary.output).unwrap();
        assert_eq!(text, "# channel1_intensity_,channel2_intensity_\n");
    }

    #[test]
    fn repeated_runs_are_identical() {
        let root = tempfile::tempdir().unwrap();
        let dir = data_dir(root.path());
        for key in ["sample0002_", "sample0001_", "sample0003_"] {
            write_tiff(&dir, &format!("{key}405.TIF"), vec![3, 5, 0, 7]);
            write_tiff(&dir, &format!("{key}488.TIF"), vec![30, 11, 8, 200]);
            write_tiff(&dir, &format!("{key}561.TIF"), vec![1, 2, 3, 4]);
            write_tiff(&dir, &format!("{key}phase.TIF"), vec![0, 0, 0, 0]);
        }

        let first = run(&dir, &AnalysisConfig::default()).unwrap();
        let first_bytes = std::fs::read(&first.output).unwrap();
        let second = run(&dir, &AnalysisConfig::default()).unwrap();
        let second_bytes = std::fs::read(&second.output).unwrap();

        assert_eq!(first_bytes, second_bytes);
        assert_eq!(first.report.record.len(), 3);
    }

    #[test]
    fn missing_folder_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("nope");

        let err = run(&missing, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::NoSuchDirectory(_)));
        assert!(!root.path().join("nope_averages1.csv").exists());
    }

    #[test]
    fn decode_failure_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let dir = data_dir(root.path());
        write_tiff(&dir, "sample0001_405.TIF", vec![1]);
        write_tiff(&dir, "sample0001_488.TIF", vec![1]);
        std::fs::write(dir.join("sample0001_561.TIF"), b"not an image").unwrap();
        write_tiff(&dir, "sample0001_dic.TIF", vec![1]);

        assert!(matches!(
            run(&dir, &AnalysisConfig::default()),
            Err(AnalysisError::Decode { .. })
        ));
        assert!(!root.path().join("plate_averages1.csv").exists());
    }
}

use std::path::Path;

use super::loader::load_channel;
use super::model::{AnalysisReport, ChannelImage, SampleGroup, SampleIntensity};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Pixel-wise division of `signal` by `reference`.
///
/// Each quotient is rounded to the nearest integer (ties to even) and never
/// exceeds the signal sample. A zero reference pixel yields 0.
/// Returns `None` when the two images differ in size.
pub fn normalize(signal: &ChannelImage, reference: &ChannelImage) -> Option<ChannelImage> {
    if signal.dimensions() != reference.dimensions() {
        return None;
    }

    let pixels = signal
        .pixels
        .iter()
        .zip(&reference.pixels)
        .map(|(&s, &r)| {
            if r == 0 {
                0
            } else {
                (f64::from(s) / f64::from(r)).round_ties_even() as u8
            }
        })
        .collect();

    Some(ChannelImage {
        width: signal.width,
        height: signal.height,
        pixels,
    })
}

// ---------------------------------------------------------------------------
// Group analysis
// ---------------------------------------------------------------------------

/// Measure every complete sample group in `folder`.
///
/// Groups whose size differs from `config.expected_channels` are skipped and
/// listed in the report. Any decode or size error aborts the whole run, so
/// the intensity sequences never get out of step.
pub fn analyze(
    folder: &Path,
    groups: &[SampleGroup],
    config: &AnalysisConfig,
) -> AnalysisResult<AnalysisReport> {
    let mut report = AnalysisReport::default();

    for group in groups {
        if group.len() != config.expected_channels {
            log::warn!(
                "Skipping sample '{}': {} of {} channel images",
                group.key,
                group.len(),
                config.expected_channels
            );
            report.skipped.push((group.key.clone(), group.len()));
            continue;
        }

        let intensity = analyze_group(folder, group)?;
        log::debug!("Sample '{}': {intensity:?}", group.key);
        report.record.push(intensity);
        report.analyzed.push(group.key.clone());
    }

    log::info!(
        "Analyzed {} sample(s), skipped {} incomplete",
        report.analyzed.len(),
        report.skipped.len()
    );
    Ok(report)
}

fn analyze_group(folder: &Path, group: &SampleGroup) -> AnalysisResult<SampleIntensity> {
    let roles = group
        .assign_roles()
        .ok_or_else(|| AnalysisError::MissingChannels {
            key: group.key.clone(),
            found: group.len(),
        })?;
    if roles.positional {
        log::warn!(
            "Sample '{}': wavelength markers not found, using sorted file positions",
            group.key
        );
    }
    log::debug!(
        "Sample '{}': reference={} signal_a={} signal_b={}",
        group.key,
        roles.reference,
        roles.signal_a,
        roles.signal_b
    );

    let reference_path = folder.join(roles.reference);
    let reference = load_channel(&reference_path)?;

    let load_signal = |name: &str| -> AnalysisResult<(ChannelImage, ChannelImage)> {
        let path = folder.join(name);
        let signal = load_channel(&path)?;
        let normalized =
            normalize(&signal, &reference).ok_or_else(|| AnalysisError::DimensionMismatch {
                path,
                expected: reference.dimensions(),
                actual: signal.dimensions(),
            })?;
        Ok((signal, normalized))
    };

    let (signal_a, normalized_a) = load_signal(roles.signal_a)?;
    let (signal_b, normalized_b) = load_signal(roles.signal_b)?;

    Ok(SampleIntensity {
        raw_a: signal_a.mean(),
        raw_b: signal_b.mean(),
        normalized_a: normalized_a.mean(),
        normalized_b: normalized_b.mean(),
    })
}

use std::path::PathBuf;

/// Errors raised while listing, decoding, analyzing or exporting channel images.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("No such directory: {}", .0.display())]
    NoSuchDirectory(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Sample '{key}' has {found} channel image(s), too few to pick reference and signals")]
    MissingChannels { key: String, found: usize },

    #[error(
        "Channel {} is {}x{} but the reference channel is {}x{}",
        .path.display(), .actual.0, .actual.1, .expected.0, .expected.1
    )]
    DimensionMismatch {
        path: PathBuf,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

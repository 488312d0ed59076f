use std::{io, path::PathBuf};

use thiserror::Error;

pub type PublishResult<T> = Result<T, PublishError>;

/// Fatal conditions of a publish run. Every variant names the path involved.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PublishError {
    #[error("source file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("failed to read source file {}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write destination {}", path.display())]
    DestinationWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to enumerate source directory {}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("mapping rule #{index} has an empty prefix")]
    EmptyPrefix { index: usize },

    #[error("invalid pattern for prefix `{prefix}`")]
    Pattern {
        prefix: String,
        #[source]
        source: regex::Error,
    },
}

impl PublishError {
    /// Classifies a failed read of `path`.
    pub(crate) fn from_read(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            PublishError::SourceNotFound { path }
        } else {
            PublishError::SourceRead { path, source }
        }
    }
}

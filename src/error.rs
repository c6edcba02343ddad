use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to open PDF source '{path}': {source}")]
    SourceOpen {
        path: PathBuf,
        source: lopdf::Error,
    },

    #[error("failed to parse PDF source bytes: {0}")]
    SourceParse(lopdf::Error),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("no pages available after applying selection")]
    NoPagesSelected,
}

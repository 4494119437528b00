use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("failed to read label file {}: {source}", path.display())]
    LabelFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("system fact lookup failed: {0}")]
    Facts(String),

    #[error("invalid fact fixture: {0}")]
    FactFixture(#[from] serde_json::Error),

    #[error("formatted labels do not fit in {capacity} bytes")]
    FormatOverflow { capacity: usize },

    /// `partial` holds everything expanded before the chunk that overflowed.
    #[error("expanded value does not fit in {capacity} bytes")]
    ExpansionOverflow { capacity: usize, partial: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

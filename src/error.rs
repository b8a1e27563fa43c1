use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EfileError {
    #[error("failed to get file info for {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("secure random source unavailable: {0}")]
    RandomSource(String),

    #[error("Invalid key size: {len} bytes. The cipher accepts 16, 24 or 32")]
    CipherInit { len: usize },

    /// Wrong key and tampered data look the same on purpose.
    #[error("authentication failed: wrong key or corrupted data")]
    Authentication,

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("failed to decode name: {0}")]
    Decode(String),

    #[error("Invalid name: {}", .0.display())]
    InvalidName(PathBuf),

    #[error("failed to rename {} -> {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a regular file or directory", path.display())]
    UnsupportedEntry { path: PathBuf },

    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),

    #[error("no input provided")]
    NoInput,

    #[error("nothing to do: both name and content transforms are disabled")]
    NothingToDo,

    #[error("Key required")]
    KeyRequired,

    #[error("Empty key is not accepted")]
    EmptyKey,

    #[error("keys do not match")]
    KeyMismatch,

    #[error("IO error: {0}")]
    Console(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EfileError {
    pub(crate) fn stat(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Stat {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable label used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Stat { .. } => "stat",
            Self::Io { .. } | Self::Console(_) => "io",
            Self::RandomSource(_) => "random-source",
            Self::CipherInit { .. } => "cipher-init",
            Self::Authentication => "authentication",
            Self::MalformedInput(_) => "malformed-input",
            Self::Decode(_) => "decode",
            Self::InvalidName(_) => "invalid-name",
            Self::Rename { .. } => "rename",
            Self::UnsupportedEntry { .. } => "unsupported-entry",
            Self::WorkerPool(_) => "worker-pool",
            Self::NoInput => "no-input",
            Self::NothingToDo => "nothing-to-do",
            Self::KeyRequired => "key-required",
            Self::EmptyKey => "empty-key",
            Self::KeyMismatch => "key-mismatch",
            Self::Json(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, EfileError>;

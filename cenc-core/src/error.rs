use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Pipeline stage an error was raised in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    Read,
    Write,
    KeyFetch,
    Encrypt,
    Map,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Discovery => "discovery",
            Stage::Read => "read",
            Stage::Write => "write",
            Stage::KeyFetch => "key-fetch",
            Stage::Encrypt => "encrypt",
            Stage::Map => "map",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum KeyError {
    #[error("key material is missing: {0}")]
    Missing(String),

    #[error("key material is malformed: {0}")]
    Malformed(String),

    #[error("{variant} expects a {expected}-byte key, got {actual} bytes")]
    KeyLength {
        variant: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("expected a {expected}-byte iv, got {actual} bytes")]
    IvLength { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum CencError {
    #[error("discovery failed: {} is neither a file nor a directory", path.display())]
    NotFound { path: PathBuf },

    #[error("{stage} failed for {}: {source}", path.display())]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("key-fetch failed: {0}")]
    Key(#[from] KeyError),

    #[error("{stage} failed: cannot grow buffer by {requested} bytes")]
    Allocation { stage: Stage, requested: usize },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CencError {
    pub fn io(stage: Stage, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CencError::Io {
            stage,
            path: path.into(),
            source,
        }
    }

    /// Stage the error was raised in; `None` for option validation.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            CencError::NotFound { .. } => Some(Stage::Discovery),
            CencError::Io { stage, .. } | CencError::Allocation { stage, .. } => Some(*stage),
            CencError::Key(_) => Some(Stage::KeyFetch),
            CencError::Config(_) => None,
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, CencError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_stage_and_path() {
        let err = CencError::io(
            Stage::Read,
            "data/a.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "read failed for data/a.txt: denied");
        assert_eq!(err.stage(), Some(Stage::Read));
    }

    #[test]
    fn key_length_reports_expected_and_actual() {
        let err: CencError = KeyError::KeyLength {
            variant: "aes128-ctr",
            expected: 16,
            actual: 10,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "key-fetch failed: aes128-ctr expects a 16-byte key, got 10 bytes"
        );
    }
}

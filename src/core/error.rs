use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the mod metadata reader.
/// Every fallible routine returns `Result<T, ModError>`.
#[derive(Debug, Error)]
pub enum ModError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Archive ─────────────────────────────────────────
    #[error("Zip read error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── JSON (mcmod.info) ───────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Properties (forgeversion.properties) ────────────
    #[error("Properties parse error at line {line}: {message}")]
    Properties { line: usize, message: String },

    // ── Descriptor shape ────────────────────────────────
    #[error("Invalid mod descriptor: {0}")]
    Descriptor(String),

    #[error("Descriptor {name} is {size} bytes, limit is {limit}")]
    TooLarge { name: String, size: u64, limit: u64 },
}

/// Convenience alias used throughout the crate.
pub type ModResult<T> = Result<T, ModError>;

impl From<std::io::Error> for ModError {
    fn from(source: std::io::Error) -> Self {
        ModError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

// Front-ends receive errors as plain strings.
impl serde::Serialize for ModError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

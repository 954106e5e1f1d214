// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — REAMS Gate Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for the REAMS gate boundary layers.
///
/// Scoring and `Gate::step` never fail; only configuration loading,
/// validation and the audit ledger surface errors.
#[derive(Error, Debug)]
pub enum ReamsError {
    /// Configuration or policy value out of range.
    #[error("config error: {0}")]
    Config(String),

    /// Invalid caller input at a boundary (paths, percentages, records).
    #[error("validation error: {0}")]
    Validation(String),

    /// Ledger or seal log I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A seal record could not be produced or verified.
    #[error("seal error: {0}")]
    Seal(String),
}

pub type ReamsResult<T> = Result<T, ReamsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            ReamsError::Config("bad floor".into()).to_string(),
            "config error: bad floor"
        );
        assert_eq!(
            ReamsError::Seal("digest mismatch".into()).to_string(),
            "seal error: digest mismatch"
        );
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ReamsError = io.into();
        assert!(matches!(err, ReamsError::Io(_)));
    }

    #[test]
    fn test_from_json() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ReamsError = parse.into();
        assert!(err.to_string().starts_with("serialization error"));
    }
}

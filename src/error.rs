//=========================================================================
// Error Types
//=========================================================================
//
// Failure taxonomy for registration, record decoding and snapshot I/O.
//
// Lookup misses are not errors: they surface as `Option::None`. A missing
// snapshot file is not an error either: it reads as "nothing to load".
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== RegistryError =======================================================

/// Prototype registration failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry key is already bound to a prototype.
    #[error("prototype key `{0}` is already registered")]
    AlreadyExists(String),

    /// The handle passed for registration does not refer to a live object.
    #[error("cannot register `{0}`: prototype object does not exist")]
    NullPrototype(String),
}

//=== CodecError ==========================================================

/// Part record decoding failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The line does not follow the `flag|type|params|x|y|z` layout or one
    /// of its fields failed to parse.
    #[error("malformed part record `{line}`: {reason}")]
    MalformedRecord { line: String, reason: String },
}

impl CodecError {
    pub(crate) fn malformed(line: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line: line.to_owned(),
            reason: reason.into(),
        }
    }
}

//=== PersistenceError ====================================================

/// Snapshot file failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading, writing or deleting the snapshot file failed.
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot file is not a valid entry list.
    #[error("snapshot is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<RegistryError>();
        assert_error::<CodecError>();
        assert_error::<PersistenceError>();
    }

    #[test]
    fn already_exists_names_the_key() {
        let err = RegistryError::AlreadyExists("spark_plug".into());
        assert_eq!(err.to_string(), "prototype key `spark_plug` is already registered");
    }

    #[test]
    fn malformed_record_carries_line_and_reason() {
        let err = CodecError::malformed("True|x", "expected 6 fields, found 2");
        let text = err.to_string();
        assert!(text.contains("True|x"));
        assert!(text.contains("expected 6 fields"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: PersistenceError = io.into();
        assert!(matches!(err, PersistenceError::Io(_)));
    }
}

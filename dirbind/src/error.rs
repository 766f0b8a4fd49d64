//! Error types for the dirbind library.
//!
//! This module provides the error hierarchy for binding, resolving and
//! enumerating directory contracts, using `thiserror` for ergonomic error
//! handling. Every failure is reported synchronously with the operation
//! signature and target path involved.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by user-supplied constructors and factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for operations that may fail with a dirbind error.
///
/// # Examples
///
/// ```
/// use dirbind::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(8080)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the dirbind library.
#[derive(Debug, Error)]
pub enum Error {
    /// No return-shape rule matched the invoked operation.
    #[error("unsupported operation {signature}: {reason}")]
    UnsupportedOperation {
        /// The operation signature, e.g. `Module::src() -> Src`.
        signature: String,
        /// Why the operation could not be classified.
        reason: String,
    },

    /// The create-if-absent action failed.
    #[error("{signature}: cannot create directory {}: {source}", path.display())]
    CreateIfAbsentFailed {
        /// The operation signature.
        signature: String,
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The create-recursive action failed.
    #[error("{signature}: cannot create directories {}: {source}", path.display())]
    CreateRecursiveFailed {
        /// The operation signature.
        signature: String,
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No constructor or factory is declared for a wrapped target type.
    #[error(
        "cannot wrap paths into {target}: declare a path constructor or a named path factory"
    )]
    WrapperResolutionFailed {
        /// The target type name.
        target: String,
    },

    /// The selected constructor or factory returned an error.
    #[error("{target}::{member} failed for {}: {source}", path.display())]
    WrapperConstructionFailed {
        /// The target type name.
        target: String,
        /// The selected member (`new` for constructors, the factory name otherwise).
        member: String,
        /// The path being wrapped.
        path: PathBuf,
        /// The error returned by the member.
        #[source]
        source: BoxError,
    },

    /// The operation requires its target to exist and it does not.
    #[error("{signature}: target does not exist: {}", path.display())]
    MissingTarget {
        /// The operation signature.
        signature: String,
        /// The missing target.
        path: PathBuf,
    },

    /// An explicit subpath argument was missing, unexpected or malformed.
    #[error("invalid argument for {signature}: {reason}")]
    InvalidArgument {
        /// The operation signature.
        signature: String,
        /// What was wrong with the argument.
        reason: String,
    },

    /// A type was bound as a contract but declares no contract.
    #[error("{target} is not a contract")]
    NotAContract {
        /// The type name.
        target: String,
    },

    /// A resolved value was converted into the wrong type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The requested type or shape.
        expected: String,
        /// The actual type or shape.
        found: String,
    },

    /// Ascension tried to climb above the filesystem root.
    #[error("{signature}: cannot ascend {depth} level(s) from {}", anchor.display())]
    AscendBeyondRoot {
        /// The operation signature.
        signature: String,
        /// The requested ascension depth.
        depth: usize,
        /// The anchor ascension started from.
        anchor: PathBuf,
    },

    /// A directory could not be enumerated.
    #[error("cannot walk {}: {source}", path.display())]
    WalkFailed {
        /// The directory that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Recursive deletion failed.
    #[error("cannot delete {}: {source}", path.display())]
    DeleteFailed {
        /// The path being deleted.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A layout validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A layout file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A layout references a contract it does not define.
    #[error("unknown contract '{name}'")]
    UnknownContract {
        /// The contract name.
        name: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if error is a must-exist violation.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirbind::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::MissingTarget {
    ///     signature: "Module::pom_xml() -> Path".to_string(),
    ///     path: PathBuf::from("/nonexistent/pom.xml"),
    /// };
    /// assert!(err.is_missing_target());
    /// ```
    #[must_use]
    pub fn is_missing_target(&self) -> bool {
        matches!(self, Self::MissingTarget { .. })
    }

    /// Check if error means the operation could not be classified.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }

    /// Check if error came from a creation action.
    #[must_use]
    pub fn is_creation_failure(&self) -> bool {
        matches!(
            self,
            Self::CreateIfAbsentFailed { .. } | Self::CreateRecursiveFailed { .. }
        )
    }
}

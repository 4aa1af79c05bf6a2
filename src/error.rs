//! Unified error types for bom-bench.
//!
//! Identifier-level failures ([`BenchError::MalformedIdentifier`]) are recovered
//! locally by the extractor; document-level failures abort one comparison and
//! surface as a scenario status.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bom-bench operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BenchError {
    /// A raw package reference could not be turned into (ecosystem, name[, version])
    #[error("Malformed identifier '{raw}': {reason}")]
    MalformedIdentifier { raw: String, reason: String },

    /// The SBOM document does not declare a recognized schema/version
    #[error("Unsupported SBOM format: {context}")]
    UnsupportedFormat {
        context: String,
        #[source]
        source: FormatErrorKind,
    },

    /// The SBOM document could not be read as JSON at all
    #[error("Failed to parse SBOM: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Reasons a document is rejected as an unsupported format
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormatErrorKind {
    #[error("missing bomFormat marker")]
    MissingBomFormat,

    #[error("unknown bomFormat '{0}' (expected CycloneDX)")]
    UnknownBomFormat(String),

    #[error("missing specVersion")]
    MissingSpecVersion,

    #[error("unsupported specVersion {version} (supported: {supported})")]
    UnsupportedVersion { version: String, supported: String },
}

/// Reasons a document could not be parsed
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Invalid field value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Convenient Result type for bom-bench operations
pub type Result<T> = std::result::Result<T, BenchError>;

impl BenchError {
    /// Create a malformed identifier error
    pub fn malformed(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(context: impl Into<String>, source: FormatErrorKind) -> Self {
        Self::UnsupportedFormat {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns true for errors that concern a single identifier rather than a whole document
    #[must_use]
    pub const fn is_identifier_level(&self) -> bool {
        matches!(self, Self::MalformedIdentifier { .. })
    }
}

impl From<std::io::Error> for BenchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are chained outermost-first, e.g.
/// `"loading actual SBOM: parsing syft/uv/simple: JSON deserialization"`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<BenchError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: BenchError, new_ctx: &str) -> BenchError {
    match err {
        BenchError::MalformedIdentifier { raw, reason } => BenchError::MalformedIdentifier {
            raw,
            reason: chain_context(new_ctx, &reason),
        },
        BenchError::UnsupportedFormat { context, source } => BenchError::UnsupportedFormat {
            context: chain_context(new_ctx, &context),
            source,
        },
        BenchError::Parse { context, source } => BenchError::Parse {
            context: chain_context(new_ctx, &context),
            source,
        },
        BenchError::Io {
            path,
            message,
            source,
        } => BenchError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        BenchError::Config(msg) => BenchError::Config(chain_context(new_ctx, &msg)),
        BenchError::Validation(msg) => BenchError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Returns "`new`: `existing`", or just `new` when nothing exists yet.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to a validation error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| BenchError::Validation(context.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BenchError::malformed("pkg:pypi/", "empty name");
        let display = err.to_string();
        assert!(display.contains("pkg:pypi/"), "{display}");
        assert!(display.contains("empty name"), "{display}");

        let err = BenchError::unsupported_format(
            "expected.cdx.json",
            FormatErrorKind::UnsupportedVersion {
                version: "1.2".to_string(),
                supported: "1.4, 1.5, 1.6".to_string(),
            },
        );
        assert!(err.to_string().contains("expected.cdx.json"));
    }

    #[test]
    fn test_io_error_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = BenchError::io("/path/to/actual.cdx.json", io_err);
        assert!(err.to_string().contains("/path/to/actual.cdx.json"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(BenchError::unsupported_format(
                "base",
                FormatErrorKind::MissingBomFormat,
            ))
        }

        fn outer() -> Result<()> {
            inner().context("middle layer").context("outer layer")
        }

        match outer() {
            Err(BenchError::UnsupportedFormat { context, source }) => {
                assert_eq!(context, "outer layer: middle layer: base");
                assert_eq!(source, FormatErrorKind::MissingBomFormat);
            }
            other => panic!("Expected UnsupportedFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;
        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called);

        let err_result: Result<i32> = Err(BenchError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called);
    }

    #[test]
    fn test_identifier_level_classification() {
        assert!(BenchError::malformed("x", "y").is_identifier_level());
        assert!(!BenchError::config("bad").is_identifier_level());
    }

    #[test]
    fn test_option_context() {
        let none_value: Option<i32> = None;
        match none_value.context_none("missing value") {
            Err(BenchError::Validation(msg)) => assert_eq!(msg, "missing value"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
        assert_eq!(Some(1).context_none("unused").ok(), Some(1));
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}

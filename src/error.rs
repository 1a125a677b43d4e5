//! Structured error types for markform.
//!
//! The variants cover the real failure sources: missing/unreadable input,
//! malformed filled-form value files, and plan/export serialization.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type returned by all public markform API functions.
#[derive(Debug, Error)]
pub enum MarkformError {
    /// The input document does not exist.
    #[error("input file not found: {}", .path.display())]
    MissingInput { path: PathBuf },

    /// An input or output file could not be read or written.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A filled-form value file failed to parse as a name→value map.
    ///
    /// The hint distinguishes syntax problems from shape problems, since the
    /// two have very different fixes.
    #[error("invalid field values in {}: {source}{}", .path.display(), hint(.source))]
    Values {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing the layout plan failed.
    #[error("failed to serialize layout plan: {0}")]
    Plan(#[from] serde_json::Error),

    /// Writing the tabular export failed.
    #[error("export failed: {0}")]
    Export(#[from] csv::Error),
}

fn hint(e: &serde_json::Error) -> &'static str {
    match e.classify() {
        serde_json::error::Category::Syntax => {
            "\n  Hint: check for trailing commas, missing quotes, or unescaped characters."
        }
        serde_json::error::Category::Data => {
            "\n  Hint: the file must be a flat JSON object mapping field names to string values."
        }
        serde_json::error::Category::Eof => "\n  Hint: unexpected end of input — is the file truncated?",
        serde_json::error::Category::Io => "",
    }
}

pub type Result<T> = std::result::Result<T, MarkformError>;

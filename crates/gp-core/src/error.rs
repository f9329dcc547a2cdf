//! Error types shared across the workspace.

use std::io;

/// Result alias using the core [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A local file could not be read or written.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    /// Hostname extraction failed for a single rule line.
    #[error("Invalid hostname in '{input}': {reason}")]
    Parse { input: String, reason: &'static str },
    /// The rule list looked base64-encoded but did not decode.
    #[error("Invalid encoded rule list: {0}")]
    Encoding(String),
}

impl Error {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn parse(input: &str, reason: &'static str) -> Self {
        Self::Parse {
            input: input.to_string(),
            reason,
        }
    }
}

//! Errors raised while reading an xsdir file

use std::path::PathBuf;

/// Type alias for results of the xsdir readers
pub type Result<T> = std::result::Result<T, Error>;

/// Things that can go wrong reading a directory file
///
/// Only [Error::FileNotFound], [Error::MissingDirectory] and [Error::Io] are
/// always fatal. A [Error::MalformedLine] aborts a strict parse but is only
/// recorded otherwise, and [Error::UnknownLibraryType] is never returned as an
/// `Err` at all. It exists so the warning logged for unrecognised suffixes has
/// the same shape as everything else.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The directory file is missing or unreadable
    #[error("could not open {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line that could not be interpreted
    #[error("malformed line {line}, {reason}: \"{text}\"")]
    MalformedLine {
        /// Line number in the source, starting at 1
        line: usize,
        /// Raw text of the line, continuations joined
        text: String,
        /// Short description of the problem
        reason: String,
    },

    /// Library type with no known category
    #[error("unknown library type '{library_type}' for {zaid}")]
    UnknownLibraryType { zaid: String, library_type: String },

    /// No `directory` marker was found
    #[error("no 'directory' section found in {0}")]
    MissingDirectory(String),

    /// Failure part way through reading the source
    #[error("failed to read line {line}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Line number of the problem, if there is one
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::MalformedLine { line, .. } | Error::Io { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Shorthand used by the parsers
    pub(crate) fn malformed(line: usize, text: &str, reason: impl Into<String>) -> Self {
        Error::MalformedLine {
            line,
            text: text.trim().to_string(),
            reason: reason.into(),
        }
    }
}

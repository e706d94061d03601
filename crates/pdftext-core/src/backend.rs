use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::string::FromUtf8Error;

use thiserror::Error;

use crate::{CapturedOutput, Invocation};

/// Which captured stream failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdout => f.write_str("stdout"),
            Stream::Stderr => f.write_str("stderr"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to launch `{}`: {source}", .program.to_string_lossy())]
    Spawn {
        program: OsString,
        #[source]
        source: std::io::Error,
    },
    #[error("{stream} is not valid UTF-8: {source}")]
    Decode {
        stream: Stream,
        #[source]
        source: FromUtf8Error,
    },
}

/// Trait for text extraction backends.
///
/// Implementors run the conversion and hand back what the process left
/// behind; classifying that into an [`Outcome`](crate::Outcome) is done by
/// [`run_extraction`](crate::run_extraction).
pub trait ExtractionBackend: Send + Sync {
    /// The invocation that [`capture`](Self::capture) would run for `path`.
    fn describe(&self, path: &Path) -> Invocation;

    /// Run the conversion on `path` and wait for it to finish.
    fn capture(&self, path: &Path) -> Result<CapturedOutput, BackendError>;
}

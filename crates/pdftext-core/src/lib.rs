use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::Output;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod backend;
pub mod config_file;

// Re-export for convenience
pub use backend::{BackendError, ExtractionBackend, Stream};
pub use config_file::{ConfigFile, load_config};

/// Input file converted when nothing else is configured.
pub const DEFAULT_INPUT_PATH: &str =
    "/Users/sachinbuluswar/Desktop/API Reference - OpenAI API.pdf";

/// A known text-conversion utility and the argument layout it expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// macOS `textutil -convert txt -stdout <path>`.
    #[default]
    Textutil,
    /// poppler `pdftotext -layout <path> -`.
    Pdftotext,
}

impl ToolKind {
    /// Binary name looked up on `PATH` when no program override is given.
    pub fn program(&self) -> &'static str {
        match self {
            ToolKind::Textutil => "textutil",
            ToolKind::Pdftotext => "pdftotext",
        }
    }

    /// Ordered argument list for converting `path` to text on stdout.
    pub fn args(&self, path: &Path) -> Vec<OsString> {
        match self {
            ToolKind::Textutil => vec![
                "-convert".into(),
                "txt".into(),
                "-stdout".into(),
                path.as_os_str().to_owned(),
            ],
            ToolKind::Pdftotext => vec![
                "-layout".into(),
                path.as_os_str().to_owned(),
                "-".into(),
            ],
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown tool `{0}` (expected `textutil` or `pdftotext`)")]
pub struct UnknownTool(pub String);

impl FromStr for ToolKind {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "textutil" => Ok(ToolKind::Textutil),
            "pdftotext" => Ok(ToolKind::Pdftotext),
            _ => Err(UnknownTool(s.to_string())),
        }
    }
}

/// One external-process invocation, built right before it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Build the invocation for `tool` on `path`, optionally replacing the
    /// binary with `program`. The argument layout always follows `tool`.
    pub fn new(tool: ToolKind, program: Option<&Path>, path: &Path) -> Self {
        Self {
            program: program
                .map(|p| p.as_os_str().to_owned())
                .unwrap_or_else(|| tool.program().into()),
            args: tool.args(path),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// What a finished process left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl TryFrom<Output> for CapturedOutput {
    type Error = BackendError;

    fn try_from(output: Output) -> Result<Self, Self::Error> {
        let stdout = String::from_utf8(output.stdout).map_err(|source| BackendError::Decode {
            stream: Stream::Stdout,
            source,
        })?;
        let stderr = String::from_utf8(output.stderr).map_err(|source| BackendError::Decode {
            stream: Stream::Stderr,
            source,
        })?;

        Ok(Self {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout,
            stderr,
        })
    }
}

/// Result of one extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The tool exited successfully; `text` is its stdout, untouched.
    Success { text: String },
    /// The tool ran but reported failure; `message` is its stderr, untouched.
    ToolFailure { message: String },
    /// The tool could not be run at all.
    LaunchFailure { message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Short stable name of the variant, used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success { .. } => "success",
            Outcome::ToolFailure { .. } => "tool_failure",
            Outcome::LaunchFailure { .. } => "launch_failure",
        }
    }
}

impl From<CapturedOutput> for Outcome {
    fn from(captured: CapturedOutput) -> Self {
        if captured.success {
            Outcome::Success {
                text: captured.stdout,
            }
        } else {
            Outcome::ToolFailure {
                message: captured.stderr,
            }
        }
    }
}

/// Run `backend` on `path` and classify what happened.
///
/// Never fails: every error is folded into [`Outcome::LaunchFailure`].
pub fn run_extraction(backend: &dyn ExtractionBackend, path: &Path) -> Outcome {
    let invocation = backend.describe(path);
    tracing::debug!(%invocation, "running extraction");

    match backend.capture(path) {
        Ok(captured) => {
            tracing::debug!(
                exit_code = ?captured.exit_code,
                stdout_len = captured.stdout.len(),
                stderr_len = captured.stderr.len(),
                "tool exited"
            );
            let outcome = Outcome::from(captured);
            if !outcome.is_success() {
                tracing::warn!(%invocation, "tool reported failure");
            }
            outcome
        }
        Err(e) => {
            tracing::warn!(%invocation, error = %e, "tool could not be launched");
            Outcome::LaunchFailure {
                message: e.to_string(),
            }
        }
    }
}

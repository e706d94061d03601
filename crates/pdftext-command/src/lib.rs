use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use pdftext_core::{BackendError, CapturedOutput, ExtractionBackend, Invocation, ToolKind};

/// Subprocess implementation of [`ExtractionBackend`].
///
/// Spawns the configured conversion utility, blocks until it exits and
/// captures both standard streams. The argument layout comes from the
/// [`ToolKind`]; only the binary can be swapped with [`with_program`].
///
/// [`with_program`]: CommandBackend::with_program
#[derive(Debug, Clone, Default)]
pub struct CommandBackend {
    tool: ToolKind,
    /// Replaces the tool's default binary name. `None` means look the
    /// default up on `PATH`.
    program: Option<PathBuf>,
}

impl CommandBackend {
    pub fn new(tool: ToolKind) -> Self {
        Self {
            tool,
            program: None,
        }
    }

    /// Run `program` instead of the tool's default binary.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }
}

impl ExtractionBackend for CommandBackend {
    fn describe(&self, path: &Path) -> Invocation {
        Invocation::new(self.tool, self.program.as_deref(), path)
    }

    fn capture(&self, path: &Path) -> Result<CapturedOutput, BackendError> {
        let invocation = self.describe(path);

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| BackendError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        tracing::trace!(status = %output.status, "child process finished");
        CapturedOutput::try_from(output)
    }
}

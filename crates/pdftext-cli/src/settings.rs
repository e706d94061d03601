use std::path::PathBuf;

use pdftext_core::{ConfigFile, DEFAULT_INPUT_PATH, ToolKind};

/// Values given on the command line. `None`/`false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub tool: Option<ToolKind>,
    pub program: Option<PathBuf>,
    pub strict: bool,
    pub no_color: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: PathBuf,
    pub tool: ToolKind,
    pub program: Option<PathBuf>,
    pub strict: bool,
    pub color: bool,
}

impl Settings {
    /// Resolve configuration: CLI flags > env vars > config file > defaults.
    pub fn resolve(
        cli: Overrides,
        env: impl Fn(&str) -> Option<String>,
        file: &ConfigFile,
    ) -> Self {
        // An empty variable counts as unset.
        let env = |key: &str| env(key).filter(|v| !v.is_empty());

        let input = cli
            .input
            .or_else(|| env("PDFTEXT_INPUT").map(PathBuf::from))
            .or_else(|| file.input_path().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH));

        let tool = cli
            .tool
            .or_else(|| {
                env("PDFTEXT_TOOL").and_then(|v| match v.parse() {
                    Ok(tool) => Some(tool),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring PDFTEXT_TOOL");
                        None
                    }
                })
            })
            .or_else(|| file.tool())
            .unwrap_or_default();

        let program = cli
            .program
            .or_else(|| env("PDFTEXT_PROGRAM").map(PathBuf::from))
            .or_else(|| file.program().map(PathBuf::from));

        let strict = cli.strict
            || env("PDFTEXT_STRICT")
                .and_then(|v| parse_flag(&v))
                .or_else(|| file.strict())
                .unwrap_or(false);

        // https://no-color.org: any non-empty value disables color.
        let color = !cli.no_color
            && env("NO_COLOR").is_none()
            && file.color().unwrap_or(true);

        Self {
            input,
            tool,
            program,
            strict,
            color,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        other => {
            tracing::warn!(value = other, "ignoring unrecognized PDFTEXT_STRICT value");
            None
        }
    }
}

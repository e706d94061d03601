use std::io::Write;

use owo_colors::OwoColorize;
use pdftext_core::Outcome;

use crate::settings::Settings;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the outcome of one extraction the way a user reads it on stdout.
pub fn print_outcome(
    w: &mut dyn Write,
    outcome: &Outcome,
    color: ColorMode,
) -> std::io::Result<()> {
    match outcome {
        Outcome::Success { text } => writeln!(w, "{}", text),
        Outcome::ToolFailure { message } => {
            if color.enabled() {
                writeln!(w, "{} {}", "Error:".red().bold(), message)
            } else {
                writeln!(w, "Error: {}", message)
            }
        }
        Outcome::LaunchFailure { message } => {
            if color.enabled() {
                writeln!(w, "{} {}", "Failed to extract PDF:".red().bold(), message)
            } else {
                writeln!(w, "Failed to extract PDF: {}", message)
            }
        }
    }
}

/// Print the resolved settings for `--show-config`.
pub fn print_settings(
    w: &mut dyn Write,
    settings: &Settings,
    sources: &[std::path::PathBuf],
    color: ColorMode,
) -> std::io::Result<()> {
    let heading = |s: &str| {
        if color.enabled() {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    };

    writeln!(w, "{}", heading("Config files:"))?;
    if sources.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for source in sources {
        writeln!(w, "  {}", source.display())?;
    }
    writeln!(w)?;
    writeln!(w, "{}", heading("Resolved settings:"))?;
    writeln!(w, "  input:   {}", settings.input.display())?;
    writeln!(w, "  tool:    {}", settings.tool)?;
    writeln!(
        w,
        "  program: {}",
        settings
            .program
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("{} (from PATH)", settings.tool.program()))
    )?;
    writeln!(w, "  strict:  {}", settings.strict)?;
    writeln!(w, "  color:   {}", settings.color)?;
    Ok(())
}

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pdftext_command::CommandBackend;
use pdftext_core::{ToolKind, run_extraction};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod output;
mod settings;

use output::ColorMode;
use settings::{Overrides, Settings};

/// Extract plain text from a PDF using an OS text-conversion utility
#[derive(Parser, Debug)]
#[command(name = "pdftext", version, about, long_about = None)]
struct Cli {
    /// PDF file to convert (default: PDFTEXT_INPUT, then the config file)
    input: Option<PathBuf>,

    /// Conversion utility to run: textutil or pdftotext
    #[arg(long)]
    tool: Option<ToolKind>,

    /// Path to the converter binary, replacing the tool's default name
    #[arg(long)]
    program: Option<PathBuf>,

    /// Exit with status 1 when extraction fails
    #[arg(long)]
    strict: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Print the resolved settings and the config files read, then exit
    #[arg(long)]
    show_config: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let config = pdftext_core::load_config();
    let overrides = Overrides {
        input: cli.input,
        tool: cli.tool,
        program: cli.program,
        strict: cli.strict,
        no_color: cli.no_color,
    };
    let settings = Settings::resolve(overrides, |key| std::env::var(key).ok(), &config);

    let stdout = std::io::stdout();
    let color = ColorMode(settings.color && stdout.is_terminal());
    let mut writer = stdout.lock();

    if cli.show_config {
        let sources = pdftext_core::config_file::existing_sources();
        output::print_settings(&mut writer, &settings, &sources, color)?;
        return Ok(ExitCode::SUCCESS);
    }

    let backend = match settings.program {
        Some(ref program) => CommandBackend::new(settings.tool).with_program(program),
        None => CommandBackend::new(settings.tool),
    };

    let outcome = run_extraction(&backend, &settings.input);
    tracing::debug!(
        outcome = outcome.label(),
        tool = %backend.tool(),
        input = %settings.input.display(),
        "extraction finished"
    );

    let printed = output::print_outcome(&mut writer, &outcome, color).and_then(|()| writer.flush());
    match printed {
        // Reader went away early (`pdftext | head`); nothing left to report.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("stdout closed before the outcome was fully written");
        }
        other => other?,
    }

    if settings.strict && !outcome.is_success() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Logs go to stderr so stdout only carries the extracted text.
/// `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ToolKind;

/// File name looked up in the working directory.
pub const CWD_CONFIG_NAME: &str = ".pdftext.toml";

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub extraction: Option<ExtractionConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub input_path: Option<String>,
    pub tool: Option<ToolKind>,
    pub program: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub strict: Option<bool>,
    pub color: Option<bool>,
}

impl ConfigFile {
    pub fn input_path(&self) -> Option<&str> {
        self.extraction.as_ref()?.input_path.as_deref()
    }

    pub fn tool(&self) -> Option<ToolKind> {
        self.extraction.as_ref()?.tool
    }

    pub fn program(&self) -> Option<&str> {
        self.extraction.as_ref()?.program.as_deref()
    }

    pub fn strict(&self) -> Option<bool> {
        self.output.as_ref()?.strict
    }

    pub fn color(&self) -> Option<bool> {
        self.output.as_ref()?.color
    }
}

/// Platform config directory path: `<config_dir>/pdftext/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdftext").join("config.toml"))
}

/// Load config by cascading CWD `.pdftext.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    load_cascade(config_path().as_deref(), Path::new(CWD_CONFIG_NAME))
}

/// Same as [`load_config`] with explicit file locations.
pub fn load_cascade(platform: Option<&Path>, cwd: &Path) -> ConfigFile {
    let platform = platform.and_then(load_from_path);
    let cwd = load_from_path(cwd);

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Config files that [`load_config`] actually reads, in cascade order.
pub fn existing_sources() -> Vec<PathBuf> {
    readable_sources(config_path().as_deref(), Path::new(CWD_CONFIG_NAME))
}

/// Same as [`existing_sources`] with explicit file locations. Missing and
/// unparsable files are left out.
pub fn readable_sources(platform: Option<&Path>, cwd: &Path) -> Vec<PathBuf> {
    platform
        .into_iter()
        .chain(std::iter::once(cwd))
        .filter(|p| load_from_path(p).is_some())
        .map(Path::to_path_buf)
        .collect()
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        extraction: Some(ExtractionConfig {
            input_path: overlay
                .input_path()
                .or_else(|| base.input_path())
                .map(str::to_string),
            tool: overlay.tool().or_else(|| base.tool()),
            program: overlay
                .program()
                .or_else(|| base.program())
                .map(str::to_string),
        }),
        output: Some(OutputConfig {
            strict: overlay.strict().or_else(|| base.strict()),
            color: overlay.color().or_else(|| base.color()),
        }),
    }
}

//! Application configuration for advisorboard.
//!
//! Config is looked up as `--config <path>`, then `./advisorboard.toml`,
//! then `~/.advisorboard/advisorboard.toml`. CLI flags override config file
//! values, which override defaults.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorBoardError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "advisorboard.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".advisorboard";

// ---------------------------------------------------------------------------
// Config structs (matching advisorboard.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input and output file locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Header labels looked up in the table.
    #[serde(default)]
    pub columns: ColumnsConfig,

    /// How the advisor array is rendered into the document.
    #[serde(default)]
    pub render: RenderConfig,
}

/// `[paths]` section. Relative paths resolve against the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// The advisor table (CSV).
    #[serde(default = "default_table")]
    pub table: PathBuf,

    /// The HTML document holding the marked region.
    #[serde(default = "default_document")]
    pub document: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            document: default_document(),
        }
    }
}

fn default_table() -> PathBuf {
    PathBuf::from("datos.csv")
}
fn default_document() -> PathBuf {
    PathBuf::from("copa_domiciliacion_embebido.html")
}

/// `[columns]` section. Labels match the header row exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default = "default_name_column")]
    pub name: String,

    #[serde(default = "default_count_column")]
    pub count: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            name: default_name_column(),
            count: default_count_column(),
        }
    }
}

fn default_name_column() -> String {
    "Name".into()
}
fn default_count_column() -> String {
    "Count".into()
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Name of the constant whose array literal is replaced.
    #[serde(default = "default_constant")]
    pub constant: String,

    /// Object key carrying the advisor name.
    #[serde(default = "default_name_field")]
    pub name_field: String,

    /// Object key carrying the advisor count.
    #[serde(default = "default_count_field")]
    pub count_field: String,

    /// Indentation of each entry relative to the declaration.
    #[serde(default = "default_entry_indent")]
    pub entry_indent: String,

    /// Emit names as escaped string literals instead of raw text.
    #[serde(default)]
    pub escape_names: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            constant: default_constant(),
            name_field: default_name_field(),
            count_field: default_count_field(),
            entry_indent: default_entry_indent(),
            escape_names: false,
        }
    }
}

fn default_constant() -> String {
    "datosAsesores".into()
}
fn default_name_field() -> String {
    "name".into()
}
fn default_count_field() -> String {
    "count".into()
}
fn default_entry_indent() -> String {
    "    ".into()
}

impl AppConfig {
    /// Check that every configured label and identifier is usable.
    pub fn validate(&self) -> Result<()> {
        static IDENT_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid regex")
        });

        for (key, value) in [
            ("render.constant", &self.render.constant),
            ("render.name_field", &self.render.name_field),
            ("render.count_field", &self.render.count_field),
        ] {
            if !IDENT_RE.is_match(value) {
                return Err(AdvisorBoardError::config(format!(
                    "{key} must be a JavaScript identifier, got {value:?}"
                )));
            }
        }

        if !self.render.entry_indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(AdvisorBoardError::config(
                "render.entry_indent may only contain spaces and tabs",
            ));
        }

        for (key, value) in [
            ("columns.name", &self.columns.name),
            ("columns.count", &self.columns.count),
        ] {
            if value.is_empty() {
                return Err(AdvisorBoardError::config(format!("{key} must not be empty")));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the user config directory (`~/.advisorboard/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AdvisorBoardError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Find the config file to use, if any.
///
/// An explicit path must exist. Otherwise the working directory is checked
/// before the user config directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(AdvisorBoardError::config(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Ok(Some(local));
    }

    // A missing home directory just means there is no user config.
    if let Ok(dir) = config_dir() {
        let user = dir.join(CONFIG_FILE_NAME);
        if user.exists() {
            return Ok(Some(user));
        }
    }

    Ok(None)
}

/// Load the application config. Returns defaults if no config file is found.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    match resolve_config_path(explicit)? {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("no config file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load and validate the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AdvisorBoardError::config(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        AdvisorBoardError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    config.validate()?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Write a default config file into `dir`. Refuses to overwrite.
/// Returns the path to the created file.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(AdvisorBoardError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| AdvisorBoardError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| AdvisorBoardError::write(&path, e))?;
    tracing::info!(path = %path.display(), "created default config file");

    Ok(path)
}

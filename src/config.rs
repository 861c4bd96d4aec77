use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::character_gen::RollMethod;
use crate::core::llm::{CliGenerator, DEFAULT_MODEL, DEFAULT_PROGRAM, DEFAULT_TIMEOUT_SECS};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub templates: TemplatesConfig,
    pub forge: ForgeConfig,
    pub export: ExportConfig,
}

/// Whether to use the external generator for biographies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiMode {
    /// Ask at startup when the runner is installed.
    #[default]
    Ask,
    /// Use it whenever it is installed.
    Always,
    /// Never probe or use it.
    Never,
}

/// External text generator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub mode: AiMode,
    /// Runner executable name or path.
    pub program: String,
    /// Model passed to the runner.
    pub model: String,
    /// Wall-clock limit for one biography, in seconds.
    pub timeout_secs: u64,
}

/// Template data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// YAML file replacing the built-in templates.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub roll_method: RollMethod,
}

/// Export destination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory for exported files. Defaults to the working directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mode: AiMode::default(),
            program: DEFAULT_PROGRAM.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GeneratorConfig {
    /// Build the subprocess generator these settings describe.
    pub fn build_generator(&self) -> CliGenerator {
        CliGenerator::builder()
            .program(&self.program)
            .model(&self.model)
            .timeout_secs(self.timeout_secs)
            .build()
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/character-forge/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, with the same fallback.
    pub fn load_from(config_path: &Path) -> Self {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}; using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}; using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Resolved export directory (override or current directory).
    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("character-forge").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

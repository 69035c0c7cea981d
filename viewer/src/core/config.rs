use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_API_ATTEMPTS, DEFAULT_TIMEOUT_SECS, DEFAULT_WIDTH,
    MAX_API_ATTEMPTS, MAX_METADATA_ENTRIES, MIN_WIDTH,
};

// =============================================================================
// File Config (JSON)
// =============================================================================

/// API configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ApiFileConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Total attempts per request
    pub retries: Option<u32>,
}

/// Render configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RenderFileConfig {
    pub width: Option<usize>,
    pub color: Option<bool>,
    pub max_metadata_entries: Option<usize>,
}

/// Trace source section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SourceFileConfig {
    /// Trace file or directory
    pub path: Option<PathBuf>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub api: Option<ApiFileConfig>,
    pub render: Option<RenderFileConfig>,
    pub source: Option<SourceFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(api) = other.api {
            let current = self.api.get_or_insert_with(ApiFileConfig::default);
            if api.base_url.is_some() {
                tracing::trace!(base_url = ?api.base_url, "Merging api.base_url");
                current.base_url = api.base_url;
            }
            if api.token.is_some() {
                tracing::trace!("Merging api.token");
                current.token = api.token;
            }
            if api.timeout_secs.is_some() {
                current.timeout_secs = api.timeout_secs;
            }
            if api.retries.is_some() {
                current.retries = api.retries;
            }
        }

        if let Some(render) = other.render {
            let current = self.render.get_or_insert_with(RenderFileConfig::default);
            if render.width.is_some() {
                tracing::trace!(width = ?render.width, "Merging render.width");
                current.width = render.width;
            }
            if render.color.is_some() {
                current.color = render.color;
            }
            if render.max_metadata_entries.is_some() {
                current.max_metadata_entries = render.max_metadata_entries;
            }
        }

        if let Some(source) = other.source
            && source.path.is_some()
        {
            tracing::trace!(path = ?source.path, "Merging source.path");
            self.source.get_or_insert_with(SourceFileConfig::default).path = source.path;
        }
    }
}

// =============================================================================
// Final Config
// =============================================================================

/// Trace API connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub max_attempts: u32,
}

/// Where traces are read from
#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    File(PathBuf),
    Api(ApiConfig),
}

/// Terminal rendering options
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub color: bool,
    pub max_metadata_entries: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            color: true,
            max_metadata_entries: MAX_METADATA_ENTRIES,
        }
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.tracescope/tracescope.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_home(path);
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");
        Self::from_layers(file_config, cli)
    }

    /// Layer CLI/env values over merged file config, then validate
    fn from_layers(file_config: FileConfig, cli: &CliConfig) -> Result<Self> {
        let file_api = file_config.api.unwrap_or_default();
        let file_render = file_config.render.unwrap_or_default();
        let file_source = file_config.source.unwrap_or_default();

        // An explicit CLI source wins over anything configured in files
        let source = if let Some(path) = &cli.file {
            SourceConfig::File(expand_home(path))
        } else if let Some(base_url) = cli.api_url.clone() {
            SourceConfig::Api(api_config(base_url, cli, &file_api))
        } else if let Some(path) = file_source.path {
            SourceConfig::File(expand_home(&path))
        } else if let Some(base_url) = file_api.base_url.clone() {
            SourceConfig::Api(api_config(base_url, cli, &file_api))
        } else {
            anyhow::bail!(
                "No trace source configured: pass --file or --api-url, or set source.path or api.base_url in {}",
                CONFIG_FILE_NAME
            );
        };

        let render = RenderConfig {
            width: cli.width.or(file_render.width).unwrap_or(DEFAULT_WIDTH),
            color: !cli.no_color && file_render.color.unwrap_or(true),
            max_metadata_entries: file_render
                .max_metadata_entries
                .unwrap_or(MAX_METADATA_ENTRIES),
        };

        let config = Self { source, render };
        config.validate()?;
        tracing::debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.render.width < MIN_WIDTH {
            anyhow::bail!(
                "Configuration error: render.width must be at least {} (got {})",
                MIN_WIDTH,
                self.render.width
            );
        }
        if let SourceConfig::Api(api) = &self.source {
            if api.base_url.trim().is_empty() {
                anyhow::bail!("Configuration error: api.base_url must not be empty");
            }
            if api.timeout_secs == 0 {
                anyhow::bail!("Configuration error: api.timeout_secs must be greater than 0");
            }
            if api.max_attempts == 0 {
                anyhow::bail!("Configuration error: api.retries must be greater than 0");
            }
            if api.max_attempts > MAX_API_ATTEMPTS {
                anyhow::bail!(
                    "Configuration error: api.retries must be at most {} (got {})",
                    MAX_API_ATTEMPTS,
                    api.max_attempts
                );
            }
        }
        Ok(())
    }
}

fn api_config(base_url: String, cli: &CliConfig, file_api: &ApiFileConfig) -> ApiConfig {
    ApiConfig {
        base_url,
        token: cli.api_token.clone().or_else(|| file_api.token.clone()),
        timeout_secs: file_api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        max_attempts: file_api.retries.unwrap_or(DEFAULT_API_ATTEMPTS),
    }
}

/// Get profile config path (~/.tracescope/tracescope.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

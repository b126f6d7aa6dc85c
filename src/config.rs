use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, PodError};

type Result<T> = std::result::Result<T, PodError>;

/// Expand tilde (~) in paths to the actual home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub post_processing: PostProcessingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// File with one feed URL per line
    pub list: PathBuf,
    /// File with one already handled media URL per line
    pub memory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub dir: PathBuf,
    pub user_agent: String,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout: u64, // seconds
    pub read_timeout: u64,    // seconds, per read, not per transfer
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessingConfig {
    pub write_tags: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
    pub format: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            list: PathBuf::from("podcast_sources.txt"),
            memory: PathBuf::from("podcasts_memory.txt"),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("downloads"),
            user_agent: format!("pod-dl/{}", env!("CARGO_PKG_VERSION")),
            dry_run: false,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: 30,
            read_timeout: 60,
        }
    }
}

impl Default for PostProcessingConfig {
    fn default() -> Self {
        Self { write_tags: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: "pretty".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout)
    }
}

/// Load configuration from environment variables
fn load_env_overrides(mut config: Config) -> Config {
    // Override with POD_DL_ prefixed environment variables
    if let Ok(val) = env::var("POD_DL_SOURCES") {
        config.sources.list = PathBuf::from(val);
    }
    if let Ok(val) = env::var("POD_DL_MEMORY") {
        config.sources.memory = PathBuf::from(val);
    }
    if let Ok(val) = env::var("POD_DL_DOWNLOAD_DIR") {
        config.download.dir = PathBuf::from(val);
    }
    if let Ok(val) = env::var("POD_DL_DRY_RUN") {
        if let Ok(dry_run) = val.parse() {
            config.download.dry_run = dry_run;
        }
    }
    if let Ok(val) = env::var("POD_DL_USER_AGENT") {
        config.download.user_agent = val;
    }

    config
}

impl Config {
    /// Get the standard config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::Invalid {
            field: "config_dir".to_string(),
            reason: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("pod-dl").join("config.toml"))
    }

    /// Load configuration from an explicit path, a local file, the standard
    /// location, or fall back to defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()).into());
                }
                Self::read_file(path)?
            }
            None => {
                let local_config = PathBuf::from("pod-dl.toml");
                if local_config.exists() {
                    Self::read_file(&local_config)?
                } else {
                    match Self::config_path() {
                        Ok(standard_config) if standard_config.exists() => {
                            Self::read_file(&standard_config)?
                        }
                        _ => {
                            tracing::debug!("No config file found, using defaults");
                            Config::default()
                        }
                    }
                }
            }
        };

        // Apply environment variable overrides
        let mut config = load_env_overrides(config);

        // Expand tilde in paths
        config.sources.list = expand_tilde(&config.sources.list);
        config.sources.memory = expand_tilde(&config.sources.memory);
        config.download.dir = expand_tilde(&config.download.dir);
        if let Some(log_file) = config.logging.file.as_ref() {
            config.logging.file = Some(expand_tilde(log_file));
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config: {}", e)))?;
        tracing::debug!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Create a sample configuration file
    pub fn create_sample<P: AsRef<Path>>(path: P) -> Result<()> {
        let sample = Self::default();
        let content = toml::to_string_pretty(&sample)
            .map_err(|e| ConfigError::ParseError(format!("Failed to serialize config: {}", e)))?;

        let commented_content = format!(
            r#"# pod-dl Configuration File
#
# All settings can be overridden via environment variables with the POD_DL_ prefix.
# For example: POD_DL_DOWNLOAD_DIR=~/Podcasts

{}

# Configuration Guide:
#
# [sources]
# list    - File with one feed URL per line ('#' starts a comment)
# memory  - File recording media URLs that were already downloaded
#
# [download]
# dir        - Where to save episodes
# user_agent - User-Agent header sent with every request
# dry_run    - Mark episodes as downloaded without fetching them
#
# [http]
# connect_timeout - Seconds to wait for a connection
# read_timeout    - Seconds to wait for the next chunk of data
#
# [post_processing]
# write_tags - Write ID3 album/title/comment tags after each download
"#,
            content
        );

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, commented_content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.sources.list.as_os_str().is_empty() {
            return Err(ConfigError::InvalidPath {
                path: self.sources.list.clone(),
                reason: "Source list not specified".to_string(),
            }
            .into());
        }

        if self.sources.memory.as_os_str().is_empty() {
            return Err(ConfigError::InvalidPath {
                path: self.sources.memory.clone(),
                reason: "Memory file not specified".to_string(),
            }
            .into());
        }

        if self.download.dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidPath {
                path: self.download.dir.clone(),
                reason: "Download directory not specified".to_string(),
            }
            .into());
        }

        if self.http.connect_timeout == 0 {
            return Err(ConfigError::Invalid {
                field: "connect_timeout".to_string(),
                reason: "Must be at least 1 second".to_string(),
            }
            .into());
        }

        if self.http.read_timeout == 0 {
            return Err(ConfigError::Invalid {
                field: "read_timeout".to_string(),
                reason: "Must be at least 1 second".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Ensure required directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.download.dir)?;

        if let Some(log_file) = &self.logging.file {
            if let Some(parent) = log_file.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(())
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(list) = overrides.source_list {
            self.sources.list = list;
        }
        if let Some(memory) = overrides.memory_file {
            self.sources.memory = memory;
        }
        if let Some(dir) = overrides.download_dir {
            self.download.dir = dir;
        }
        if overrides.dry_run {
            self.download.dry_run = true;
        }
        if overrides.no_tags {
            self.post_processing.write_tags = false;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }
}

/// Command-line configuration overrides
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub source_list: Option<PathBuf>,
    pub memory_file: Option<PathBuf>,
    pub download_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub no_tags: bool,
    pub log_level: Option<String>,
}

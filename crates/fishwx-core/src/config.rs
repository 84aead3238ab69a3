use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// One problem found by [`Config::validate`], keyed by its dotted TOML path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors block loading; warnings are only logged.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        self.errors.push(ValidationIssue { field, message });
    }

    fn warn(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        self.warnings.push(ValidationIssue { field, message });
    }

    pub fn error_summary(&self) -> String {
        let mut summary = String::new();
        for issue in &self.errors {
            if !summary.is_empty() {
                summary.push_str("; ");
            }
            summary.push_str(&issue.to_string());
        }
        summary
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Shared snapshot store written by the main application
    #[serde(default)]
    pub store: StoreConfig,

    /// Clock tick and layout selection
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Keep-alive presence while widgets are placed
    #[serde(default)]
    pub keep_alive: KeepAliveConfig,

    /// Deep link back into the main application
    #[serde(default)]
    pub launch: LaunchConfig,

    /// Display language selection
    #[serde(default)]
    pub locale: LocaleConfig,

    /// Reload policy for pull-style (timeline) hosts
    #[serde(default)]
    pub timeline: TimelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON key-value file shared with the main application
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fishwx")
}

fn default_store_path() -> PathBuf {
    default_config_dir().join("widget_data.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Clock tick period in seconds (default: 60)
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: u64,

    /// Minimum host width at which the large layout is used (default: 250)
    #[serde(default = "default_compact_width_threshold")]
    pub compact_width_threshold: u32,
}

fn default_tick_seconds() -> u64 {
    60
}

fn default_compact_width_threshold() -> u32 {
    250
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            tick_seconds: default_tick_seconds(),
            compact_width_threshold: default_compact_width_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeepAliveConfig {
    /// Run the keep-alive guardian on hosts that support it
    #[serde(default = "default_keep_alive_enabled")]
    pub enabled: bool,

    /// Delay before the first self-check, in seconds (default: 60)
    #[serde(default = "default_initial_delay_seconds")]
    pub initial_delay_seconds: u64,

    /// Period between self-checks, in seconds (default: 300)
    #[serde(default = "default_check_interval_seconds")]
    pub check_interval_seconds: u64,
}

fn default_keep_alive_enabled() -> bool {
    true
}

fn default_initial_delay_seconds() -> u64 {
    60
}

fn default_check_interval_seconds() -> u64 {
    300
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            enabled: default_keep_alive_enabled(),
            initial_delay_seconds: default_initial_delay_seconds(),
            check_interval_seconds: default_check_interval_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Entry surface of the main application
    #[serde(default = "default_launch_uri")]
    pub uri: String,
}

fn default_launch_uri() -> String {
    "fishingweather://home".to_string()
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            uri: default_launch_uri(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Language tag that replaces the host-reported device locale
    #[serde(default, rename = "override")]
    pub override_tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Minutes until a pull-style host should ask for a new timeline (default: 30)
    #[serde(default = "default_reload_minutes")]
    pub reload_minutes: u32,
}

fn default_reload_minutes() -> u32 {
    30
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            reload_minutes: default_reload_minutes(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            refresh: RefreshConfig::default(),
            keep_alive: KeepAliveConfig::default(),
            launch: LaunchConfig::default(),
            locale: LocaleConfig::default(),
            timeline: TimelineConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, writing defaults there if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails; warnings are logged.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.refresh.tick_seconds == 0 {
            result.error("refresh.tick_seconds", "Clock tick must be greater than 0");
        } else if self.refresh.tick_seconds > 3600 {
            result.warn(
                "refresh.tick_seconds",
                "Clock tick is longer than an hour; the displayed time will lag",
            );
        }

        if self.refresh.compact_width_threshold == 0 {
            result.error(
                "refresh.compact_width_threshold",
                "Width threshold must be greater than 0",
            );
        }

        if self.keep_alive.enabled {
            if self.keep_alive.check_interval_seconds == 0 {
                result.error(
                    "keep_alive.check_interval_seconds",
                    "Self-check interval must be greater than 0",
                );
            } else if self.keep_alive.check_interval_seconds < self.refresh.tick_seconds {
                result.warn(
                    "keep_alive.check_interval_seconds",
                    "Self-check runs more often than the clock tick",
                );
            }
        }

        if self.timeline.reload_minutes == 0 {
            result.warn("timeline.reload_minutes", "Timeline reload disabled (0 minutes)");
        }

        match Url::parse(&self.launch.uri) {
            Ok(url) if url.cannot_be_a_base() => {
                result.error("launch.uri", "Launch URI must be hierarchical (scheme://...)");
            }
            Ok(_) => {}
            Err(e) => result.error("launch.uri", format!("Invalid URI: {}", e)),
        }

        result
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("fishwx");

        Ok(config_dir.join("config.toml"))
    }
}

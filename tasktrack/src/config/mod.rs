//! Configuration system for `TaskTrack`.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/tasktrack/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error. The resolved
//! configuration is read once at startup and never changes afterwards.

use std::path::PathBuf;

use chrono::NaiveTime;
use tasktrack_model::EntityKind;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The sweep time is not a valid `HH:MM` time of day.
    #[error("invalid close time \"{0}\" (expected HH:MM)")]
    InvalidCloseTime(String),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    limits: LimitsFileConfig,
    scheduler: SchedulerFileConfig,
}

/// `[limits]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct LimitsFileConfig {
    max_projects: Option<usize>,
    max_project_title_len: Option<usize>,
    max_project_desc_len: Option<usize>,
    max_tasks: Option<usize>,
    max_task_title_len: Option<usize>,
    max_task_desc_len: Option<usize>,
}

/// `[scheduler]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SchedulerFileConfig {
    enabled: Option<bool>,
    close_time: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Count and length limits for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindLimits {
    /// Maximum number of entities in one collection.
    pub max_count: usize,
    /// Maximum title length in characters.
    pub max_title_len: usize,
    /// Maximum description length in characters.
    pub max_desc_len: usize,
}

/// Entity limits enforced by the managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of projects.
    pub max_projects: usize,
    /// Maximum project title length in characters.
    pub max_project_title_len: usize,
    /// Maximum project description length in characters.
    pub max_project_desc_len: usize,
    /// Maximum number of tasks per project.
    pub max_tasks: usize,
    /// Maximum task title length in characters.
    pub max_task_title_len: usize,
    /// Maximum task description length in characters.
    pub max_task_desc_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_projects: 10,
            max_project_title_len: 30,
            max_project_desc_len: 150,
            max_tasks: 50,
            max_task_title_len: 30,
            max_task_desc_len: 150,
        }
    }
}

impl Limits {
    /// Returns the limits that apply to `kind`.
    #[must_use]
    pub const fn for_kind(&self, kind: EntityKind) -> KindLimits {
        match kind {
            EntityKind::Project => KindLimits {
                max_count: self.max_projects,
                max_title_len: self.max_project_title_len,
                max_desc_len: self.max_project_desc_len,
            },
            EntityKind::Task => KindLimits {
                max_count: self.max_tasks,
                max_title_len: self.max_task_title_len,
                max_desc_len: self.max_task_desc_len,
            },
        }
    }
}

/// Overdue sweep scheduling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Whether the background sweep runs at all.
    pub enabled: bool,
    /// Local wall-clock time of day at which the sweep fires.
    pub close_time: NaiveTime,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            close_time: NaiveTime::MIN,
        }
    }
}

/// Fully resolved application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Entity limits.
    pub limits: Limits,
    /// Overdue sweep scheduling.
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// If no `--config` is given, the default path
    /// (`~/.config/tasktrack/config.toml`) is tried and silently ignored if
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read,
    /// any config file cannot be parsed, or the close time is malformed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Resolve an `AppConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let limits = &file.limits;

        let close_time = match cli
            .close_time
            .as_deref()
            .or(file.scheduler.close_time.as_deref())
        {
            Some(raw) => parse_close_time(raw)?,
            None => defaults.scheduler.close_time,
        };

        Ok(Self {
            limits: Limits {
                max_projects: cli
                    .max_projects
                    .or(limits.max_projects)
                    .unwrap_or(defaults.limits.max_projects),
                max_project_title_len: cli
                    .max_project_title_len
                    .or(limits.max_project_title_len)
                    .unwrap_or(defaults.limits.max_project_title_len),
                max_project_desc_len: cli
                    .max_project_desc_len
                    .or(limits.max_project_desc_len)
                    .unwrap_or(defaults.limits.max_project_desc_len),
                max_tasks: cli
                    .max_tasks
                    .or(limits.max_tasks)
                    .unwrap_or(defaults.limits.max_tasks),
                max_task_title_len: cli
                    .max_task_title_len
                    .or(limits.max_task_title_len)
                    .unwrap_or(defaults.limits.max_task_title_len),
                max_task_desc_len: cli
                    .max_task_desc_len
                    .or(limits.max_task_desc_len)
                    .unwrap_or(defaults.limits.max_task_desc_len),
            },
            scheduler: SchedulerConfig {
                enabled: !cli.no_scheduler
                    && file
                        .scheduler
                        .enabled
                        .unwrap_or(defaults.scheduler.enabled),
                close_time,
            },
        })
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Project and task tracker with overdue auto-closing")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/tasktrack/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of projects.
    #[arg(long, env = "TASKTRACK_MAX_PROJECTS")]
    pub max_projects: Option<usize>,

    /// Maximum project title length in characters.
    #[arg(long, env = "TASKTRACK_MAX_PROJECT_TITLE_LEN")]
    pub max_project_title_len: Option<usize>,

    /// Maximum project description length in characters.
    #[arg(long, env = "TASKTRACK_MAX_PROJECT_DESC_LEN")]
    pub max_project_desc_len: Option<usize>,

    /// Maximum number of tasks per project.
    #[arg(long, env = "TASKTRACK_MAX_TASKS")]
    pub max_tasks: Option<usize>,

    /// Maximum task title length in characters.
    #[arg(long, env = "TASKTRACK_MAX_TASK_TITLE_LEN")]
    pub max_task_title_len: Option<usize>,

    /// Maximum task description length in characters.
    #[arg(long, env = "TASKTRACK_MAX_TASK_DESC_LEN")]
    pub max_task_desc_len: Option<usize>,

    /// Local time of day (HH:MM) at which overdue tasks are closed.
    #[arg(long, env = "TASKTRACK_CLOSE_TIME")]
    pub close_time: Option<String>,

    /// Do not start the background sweep.
    #[arg(long)]
    pub no_scheduler: bool,

    /// Run one overdue sweep and exit.
    #[arg(long)]
    pub sweep_once: bool,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKTRACK_LOG")]
    pub log_level: String,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn parse_close_time(raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| ConfigError::InvalidCloseTime(raw.to_string()))
}

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("tasktrack").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}

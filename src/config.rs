use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::matcher::InputMode;
use crate::keyboard::platform::Platform;
use crate::session::SessionSettings;
use crate::session::badge::BadgeThresholds;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_question_secs")]
    pub question_secs: u32,
    #[serde(default = "default_ack_delay_ms")]
    pub ack_delay_ms: u64,
    #[serde(default = "default_warn_secs")]
    pub warn_secs: u32,
    #[serde(default = "default_danger_secs")]
    pub danger_secs: u32,
    #[serde(default = "default_gold_score")]
    pub gold_score: u32,
    #[serde(default = "default_silver_score")]
    pub silver_score: u32,
    #[serde(default = "default_bronze_score")]
    pub bronze_score: u32,
    #[serde(default = "default_input_mode")]
    pub input_mode: InputMode,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

fn default_question_count() -> usize {
    10
}
fn default_question_secs() -> u32 {
    15
}
fn default_ack_delay_ms() -> u64 {
    1200
}
fn default_warn_secs() -> u32 {
    5
}
fn default_danger_secs() -> u32 {
    2
}
fn default_gold_score() -> u32 {
    10
}
fn default_silver_score() -> u32 {
    8
}
fn default_bronze_score() -> u32 {
    5
}
fn default_input_mode() -> InputMode {
    InputMode::Immediate
}
fn default_platform() -> String {
    "auto".to_string()
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            question_secs: default_question_secs(),
            ack_delay_ms: default_ack_delay_ms(),
            warn_secs: default_warn_secs(),
            danger_secs: default_danger_secs(),
            gold_score: default_gold_score(),
            silver_score: default_silver_score(),
            bronze_score: default_bronze_score(),
            input_mode: default_input_mode(),
            platform: default_platform(),
            theme: default_theme(),
            catalog_path: None,
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let mut config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chordquiz")
            .join("config.toml")
    }

    pub fn log_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chordquiz")
            .join("chordquiz.log")
    }

    /// Clamp values that would leave the quiz unplayable or the badge tiers
    /// out of order.
    pub fn normalize(&mut self) {
        self.question_count = self.question_count.max(1);
        self.question_secs = self.question_secs.max(1);
        self.danger_secs = self.danger_secs.min(self.warn_secs);
        self.silver_score = self.silver_score.min(self.gold_score);
        self.bronze_score = self.bronze_score.min(self.silver_score);
        if self.platform.parse::<Platform>().is_err() {
            self.platform = default_platform();
        }
    }

    pub fn platform(&self) -> Platform {
        Platform::resolve(&self.platform)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            question_count: self.question_count,
            question_secs: self.question_secs,
            ack_delay: Duration::from_millis(self.ack_delay_ms),
            warn_secs: self.warn_secs,
            danger_secs: self.danger_secs,
            badges: BadgeThresholds {
                gold: self.gold_score,
                silver: self.silver_score,
                bronze: self.bronze_score,
            },
        }
    }
}

/// The config as it is on disk, kept apart from the effective per-run
/// settings so that saving a preference never writes CLI overrides back.
/// A file that failed to parse is never overwritten.
#[derive(Debug)]
pub struct ConfigFile {
    path: PathBuf,
    contents: Option<Config>,
}

impl ConfigFile {
    pub fn open(path: PathBuf) -> Self {
        let contents = match Config::load_from(&path) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(path = %path.display(), "config unreadable, using defaults: {err:#}");
                None
            }
        };
        Self { path, contents }
    }

    /// Starting point for the effective config of this run.
    pub fn config(&self) -> Config {
        self.contents.clone().unwrap_or_default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists the input mode alone. Returns `false` when the file is
    /// left untouched because it could not be read.
    pub fn save_input_mode(&mut self, mode: InputMode) -> Result<bool> {
        let Some(contents) = self.contents.as_mut() else {
            return Ok(false);
        };
        contents.input_mode = mode;
        contents.save_to(&self.path)?;
        Ok(true)
    }
}

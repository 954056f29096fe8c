/// Runtime configuration (not gameplay tuning for the platformers, which
/// stays in each game's constants).
///
/// Sources, lowest precedence first: built-in defaults, a TOML file
/// (`ARCADE_CONFIG`, else `./arcade.toml` when present), then `ARCADE_*`
/// environment variables.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::input::HOLD_WINDOW;
use crate::scores::FileScoreStore;
use crate::snake::SnakeRules;

const DEFAULT_CONFIG_FILE: &str = "arcade.toml";

/// The starting snake is three cells long and needs room to move.
pub const SNAKE_MIN_COLS: i32 = 5;
pub const SNAKE_MIN_ROWS: i32 = 3;
pub const SNAKE_MAX_CELLS: i32 = 200;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Render / simulation frame length in milliseconds.
    pub frame_ms: u64,
    /// Frames a key counts as held after its last press or repeat.
    pub hold_window: u64,
    pub log_file: PathBuf,
    pub score_dir: PathBuf,
    pub snake: SnakeRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            hold_window: HOLD_WINDOW,
            log_file: PathBuf::from("arcade_cabinet.log"),
            score_dir: FileScoreStore::default_dir(),
            snake: SnakeRules::default(),
        }
    }
}

impl Config {
    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("parsing arcade config")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings no game can run with.
    pub fn validate(&self) -> Result<()> {
        let snake = &self.snake;
        if !(SNAKE_MIN_COLS..=SNAKE_MAX_CELLS).contains(&snake.cols) {
            bail!(
                "snake.cols must be between {SNAKE_MIN_COLS} and {SNAKE_MAX_CELLS}, got {}",
                snake.cols
            );
        }
        if !(SNAKE_MIN_ROWS..=SNAKE_MAX_CELLS).contains(&snake.rows) {
            bail!(
                "snake.rows must be between {SNAKE_MIN_ROWS} and {SNAKE_MAX_CELLS}, got {}",
                snake.rows
            );
        }
        if snake.min_interval_ms == 0 || snake.min_interval_ms > snake.start_interval_ms {
            bail!(
                "snake.min_interval_ms must be in 1..={} (start_interval_ms), got {}",
                snake.start_interval_ms,
                snake.min_interval_ms
            );
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    /// Applies `ARCADE_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(ms) = lookup("ARCADE_FRAME_MS").and_then(|v| v.parse().ok()) {
            self.frame_ms = ms;
        }
        if let Some(dir) = lookup("ARCADE_SCORE_DIR") {
            self.score_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup("ARCADE_LOG_FILE") {
            self.log_file = PathBuf::from(file);
        }
        self
    }
}

/// Resolves the config file and environment into a [`Config`].
pub fn load() -> Result<Config> {
    let explicit = env::var("ARCADE_CONFIG").ok().map(PathBuf::from);
    let base = match explicit {
        Some(path) => Config::from_file(&path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Config::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => Config::default(),
    };
    let config = base.with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// High-score persistence.
///
/// A score lives under a fixed key and is stored as a decimal string. A
/// missing or unparsable value reads back as 0.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

/// Key under which Snake keeps its best score.
pub const SNAKE_HIGH_KEY: &str = "snakeHigh";

pub trait ScoreStore {
    fn load(&self, key: &str) -> Result<u32>;
    fn save(&mut self, key: &str, score: u32) -> Result<()>;
}

/// Saves `score` under `key` if it is at least the stored best.
/// Returns the best score after the call.
pub fn record_high_score(store: &mut impl ScoreStore, key: &str, score: u32) -> Result<u32> {
    let previous = store.load(key)?;
    if score >= previous && score > 0 {
        store.save(key, score)?;
        if score > previous {
            info!(key, score, previous, "new high score");
        }
        Ok(score)
    } else {
        Ok(previous)
    }
}

fn parse_score(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

// ── File-backed store ─────────────────────────────────────────────────────────

/// One file per key inside `dir`.
#[derive(Clone, Debug)]
pub struct FileScoreStore {
    dir: PathBuf,
}

impl FileScoreStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$HOME/.arcade_cabinet`, or `./.arcade_cabinet` without a home.
    pub fn default_dir() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".arcade_cabinet")
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self, key: &str) -> Result<u32> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(parse_score(&raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(err) => Err(anyhow::Error::new(err)
                .context(format!("reading score file {}", path.display()))),
        }
    }

    fn save(&mut self, key: &str, score: u32) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating score directory {}", self.dir.display()))?;
        let path = self.path_for(key);
        std::fs::write(&path, score.to_string())
            .with_context(|| format!("writing score file {}", path.display()))
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Holds raw strings so parsing behaves exactly like the file store.
#[derive(Clone, Debug, Default)]
pub struct MemoryScoreStore {
    entries: HashMap<String, String>,
}

impl MemoryScoreStore {
    pub fn with_raw(key: &str, raw: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), raw.to_string());
        Self { entries }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self, key: &str) -> Result<u32> {
        Ok(self.entries.get(key).map(|raw| parse_score(raw)).unwrap_or(0))
    }

    fn save(&mut self, key: &str, score: u32) -> Result<()> {
        self.entries.insert(key.to_string(), score.to_string());
        Ok(())
    }
}

//! Flat-file persistence for cycle-over-cycle coin sets and the alert log

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::models::alert::AlertLogEntry;
use crate::signals::decision::CoinSet;

pub const ALERT_LOG_FILE: &str = "alerts_log.txt";

#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("state I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Named records kept between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    /// Configured coin universe as of the previous cycle.
    CoinUniverse,
    /// Coins that satisfied the MA condition in the previous cycle.
    QualifyingCoins,
}

impl StateKey {
    pub fn name(&self) -> &'static str {
        match self {
            StateKey::CoinUniverse => "previous_coin_list",
            StateKey::QualifyingCoins => "previous_ma_coins",
        }
    }
}

#[async_trait]
pub trait StateStore: Send + Sync {
    /// An empty set when the key was never saved.
    async fn load(&self, key: StateKey) -> Result<CoinSet, StateStoreError>;

    async fn save(&self, key: StateKey, coins: &CoinSet) -> Result<(), StateStoreError>;

    async fn append_alerts(&self, entries: &[AlertLogEntry]) -> Result<(), StateStoreError>;
}

/// One newline-delimited file per key under `base_dir`, plus the alert log.
///
/// Writes go to a `.tmp` sibling and are renamed over the target, so a crash
/// mid-write leaves the previous contents intact.
pub struct FileStateStore {
    base_dir: PathBuf,
}

impl FileStateStore {
    pub async fn new(base_dir: impl Into<PathBuf>) -> Result<Self, StateStoreError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|source| StateStoreError::Io {
                path: base_dir.clone(),
                source,
            })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path_for(&self, key: StateKey) -> PathBuf {
        self.base_dir.join(format!("{}.txt", key.name()))
    }

    pub fn alert_log_path(&self) -> PathBuf {
        self.base_dir.join(ALERT_LOG_FILE)
    }

    async fn read_optional(&self, path: &Path) -> Result<Option<String>, StateStoreError> {
        match fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StateStoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    async fn replace(&self, path: &Path, contents: &str) -> Result<(), StateStoreError> {
        let tmp_path = path.with_extension("tmp");
        let io_err = |source| StateStoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        fs::write(&tmp_path, contents).await.map_err(io_err)?;
        fs::rename(&tmp_path, path).await.map_err(io_err)?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self, key: StateKey) -> Result<CoinSet, StateStoreError> {
        let path = self.path_for(key);
        let Some(contents) = self.read_optional(&path).await? else {
            debug!(key = key.name(), "StateStore: no saved state");
            return Ok(CoinSet::new());
        };

        let coins: CoinSet = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(coins)
    }

    async fn save(&self, key: StateKey, coins: &CoinSet) -> Result<(), StateStoreError> {
        let mut contents = coins.iter().cloned().collect::<Vec<_>>().join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        self.replace(&self.path_for(key), &contents).await?;

        debug!(key = key.name(), count = coins.len(), "StateStore: saved {} coins", coins.len());
        Ok(())
    }

    async fn append_alerts(&self, entries: &[AlertLogEntry]) -> Result<(), StateStoreError> {
        if entries.is_empty() {
            return Ok(());
        }

        let path = self.alert_log_path();
        let mut contents = self.read_optional(&path).await?.unwrap_or_default();
        if !contents.is_empty() && !contents.ends_with('\n') {
            contents.push('\n');
        }
        for entry in entries {
            contents.push_str(&entry.to_line());
            contents.push('\n');
        }
        self.replace(&path, &contents).await
    }
}

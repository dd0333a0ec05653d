//! Saved-portfolio store: a small JSON file of named portfolios.
//!
//! The store keeps positions in their text form so a saved portfolio goes
//! back through the same validation as any other input when it is loaded.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use folio::{Position, RawPosition};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One named portfolio in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPortfolio {
    pub name: String,
    pub positions: Vec<RawPosition>,
    pub saved_at: DateTime<Utc>,
}

/// Whether a save created a new entry or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Replaced,
}

/// Capacity-limited store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct PortfolioStore {
    path: PathBuf,
    max_portfolios: usize,
}

impl PortfolioStore {
    pub fn new(path: impl Into<PathBuf>, max_portfolios: usize) -> Self {
        Self {
            path: path.into(),
            max_portfolios,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_portfolios(&self) -> usize {
        self.max_portfolios
    }

    /// All saved portfolios in insertion order.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// logged and also read as empty.
    pub fn list(&self) -> Vec<SavedPortfolio> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                log::warn!("cannot read store {}: {e}", self.path.display());
                return Vec::new();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("ignoring corrupt store {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    /// Names are matched after trimming, the same way [`save`](Self::save) stores them.
    pub fn get(&self, name: &str) -> Option<SavedPortfolio> {
        let name = name.trim();
        self.list().into_iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Save `positions` under `name`.
    ///
    /// An existing name is replaced in place. A new name fails with
    /// [`Error::StoreFull`] once the store holds `max_portfolios` entries.
    pub fn save(&self, name: &str, positions: &[Position]) -> Result<SaveOutcome> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Store("portfolio name must not be empty".into()));
        }

        let entry = SavedPortfolio {
            name: name.to_string(),
            positions: positions.iter().map(Position::to_raw).collect(),
            saved_at: Utc::now(),
        };

        let mut entries = self.list();
        let outcome = match entries.iter_mut().find(|p| p.name == name) {
            Some(existing) => {
                *existing = entry;
                SaveOutcome::Replaced
            }
            None => {
                if entries.len() >= self.max_portfolios {
                    return Err(Error::StoreFull {
                        max: self.max_portfolios,
                    });
                }
                entries.push(entry);
                SaveOutcome::Created
            }
        };

        self.write(&entries)?;
        log::info!("saved portfolio \"{name}\" ({outcome:?})");
        Ok(outcome)
    }

    /// Remove `name`. Returns `false` if nothing was stored under it.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        let mut entries = self.list();
        let before = entries.len();
        entries.retain(|p| p.name != name);
        if entries.len() == before {
            return Ok(false);
        }
        self.write(&entries)?;
        log::info!("deleted portfolio \"{name}\"");
        Ok(true)
    }

    fn write(&self, entries: &[SavedPortfolio]) -> Result<()> {
        let store_err = |e: &dyn std::fmt::Display| {
            Error::Store(format!("cannot write {}: {e}", self.path.display()))
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| store_err(&e))?;
            }
        }
        let json = serde_json::to_string_pretty(entries).map_err(|e| store_err(&e))?;
        fs::write(&self.path, json).map_err(|e| store_err(&e))?;
        Ok(())
    }
}

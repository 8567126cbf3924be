use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use vigil_core::VigilError;

/// Write-through store of acknowledged record ids.
///
/// Persisted as a JSON array of strings in one file. A missing or corrupt
/// file loads as an empty set; every mutation rewrites the file before
/// returning. Acknowledgement is one-way: ids are only ever added.
#[derive(Debug)]
pub struct AckStore {
    path: PathBuf,
    ids: BTreeSet<String>,
}

impl AckStore {
    /// Load the persisted set. Absence and parse failure both start empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids = std::fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str::<Vec<String>>(&text).ok())
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default();
        Self { path, ids }
    }

    /// Load from the default path (`~/.vigil/acknowledged.json`).
    pub fn load_default() -> Self {
        Self::load(default_store_path())
    }

    pub fn is_acknowledged(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Add one id and persist. Re-acknowledging is a no-op.
    pub fn acknowledge(&mut self, id: &str) -> Result<(), VigilError> {
        if self.ids.insert(id.to_string()) {
            self.persist()?;
        }
        Ok(())
    }

    /// Union a batch of ids in a single persist.
    pub fn acknowledge_all<I, S>(&mut self, ids: I) -> Result<(), VigilError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.ids.len();
        self.ids.extend(ids.into_iter().map(Into::into));
        if self.ids.len() != before {
            self.persist()?;
        }
        Ok(())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), VigilError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let ids: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        let text = serde_json::to_string(&ids).map_err(|e| VigilError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Default store path: ~/.vigil/acknowledged.json
pub fn default_store_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home).join(".vigil").join("acknowledged.json")
}

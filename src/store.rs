//! Checklist persistence.
//!
//! Generation is pure; keeping checklists between invocations is the job of a
//! `ChecklistStore` owned by the front end. `JsonFileStore` keeps one JSON file
//! per checklist using the naming convention `<name>_checklist.json`.
//! `MemoryStore` keeps them in a map.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ChecklistError, Result};
use crate::task::Checklist;

const FILE_SUFFIX: &str = "_checklist";

/// Named storage for checklists. Names are sanitised with
/// [`sanitize_checklist_name`] before use.
pub trait ChecklistStore {
    fn load(&self, name: &str) -> Result<Checklist>;
    fn save(&mut self, name: &str, checklist: &Checklist) -> Result<()>;
    fn delete(&mut self, name: &str) -> Result<()>;
    /// Stored checklist names, sorted.
    fn list(&self) -> Result<Vec<String>>;

    fn exists(&self, name: &str) -> Result<bool> {
        let key = sanitize_checklist_name(name);
        Ok(self.list()?.iter().any(|n| *n == key))
    }
}

/// Directory of JSON files, one per checklist.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(JsonFileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}.json", sanitize_checklist_name(name), FILE_SUFFIX))
    }
}

impl ChecklistStore for JsonFileStore {
    fn load(&self, name: &str) -> Result<Checklist> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(ChecklistError::ChecklistNotFound(name.to_string()));
        }
        let data = fs::read_to_string(&path)?;
        debug!(path = %path.display(), "loaded checklist");
        Ok(serde_json::from_str(&data)?)
    }

    /// Atomic-ish write via temp + rename.
    fn save(&mut self, name: &str, checklist: &Checklist) -> Result<()> {
        let path = self.path_for(name);
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(checklist)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "saved checklist");
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(ChecklistError::ChecklistNotFound(name.to_string()));
        }
        fs::remove_file(&path)?;
        debug!(path = %path.display(), "deleted checklist");
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(name) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_suffix(FILE_SUFFIX))
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    checklists: BTreeMap<String, Checklist>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChecklistStore for MemoryStore {
    fn load(&self, name: &str) -> Result<Checklist> {
        self.checklists
            .get(&sanitize_checklist_name(name))
            .cloned()
            .ok_or_else(|| ChecklistError::ChecklistNotFound(name.to_string()))
    }

    fn save(&mut self, name: &str, checklist: &Checklist) -> Result<()> {
        self.checklists.insert(sanitize_checklist_name(name), checklist.clone());
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        self.checklists
            .remove(&sanitize_checklist_name(name))
            .map(|_| ())
            .ok_or_else(|| ChecklistError::ChecklistNotFound(name.to_string()))
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.checklists.keys().cloned().collect())
    }
}

/// Convert a display name to a safe checklist name for file naming.
/// Lowercases, and collapses any run of non-alphanumeric characters to one underscore.
pub fn sanitize_checklist_name(display_name: &str) -> String {
    display_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

use crate::assignment::AssignmentTable;
use crate::config::UnitConfig;
use crate::error::{MusterError, Result};
use crate::io;
use crate::paths;
use crate::progress::{UpdateProgress, ZenProgress};
use crate::store::Store;
use crate::types::UnitId;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// UnitMeta
// ---------------------------------------------------------------------------

/// Bookkeeping stamp written alongside the unit documents on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitMeta {
    pub last_updated: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// YAML documents per unit under `.muster/units/<unit>/`, written atomically.
///
/// Reads of a missing document return the empty/default value, matching the
/// "absence means not yet" semantics of the tables — but a workspace without
/// a `.muster/` directory at all is `NotInitialized`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Scaffold the `.muster/` tree. Idempotent.
    pub fn init(root: &Path) -> Result<()> {
        io::ensure_dir(&paths::units_dir(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn meta(&self, unit: UnitId) -> Result<Option<UnitMeta>> {
        let path = paths::meta_path(&self.root, unit);
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(Some(serde_yaml::from_str(&data)?))
    }

    fn load_doc<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T> {
        if !paths::muster_dir(&self.root).is_dir() {
            return Err(MusterError::NotInitialized);
        }
        if !path.exists() {
            return Ok(T::default());
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    fn save_doc<T: Serialize>(&self, unit: UnitId, path: &Path, doc: &T) -> Result<()> {
        if !paths::muster_dir(&self.root).is_dir() {
            return Err(MusterError::NotInitialized);
        }
        let data = serde_yaml::to_string(doc)?;
        io::atomic_write(path, data.as_bytes())?;
        let meta = UnitMeta {
            last_updated: Utc::now(),
        };
        let meta_data = serde_yaml::to_string(&meta)?;
        io::atomic_write(&paths::meta_path(&self.root, unit), meta_data.as_bytes())
    }
}

impl Store for FileStore {
    fn get_assignments(&self, unit: UnitId) -> Result<AssignmentTable> {
        self.load_doc(&paths::assignments_path(&self.root, unit))
    }

    fn set_assignments(&self, unit: UnitId, table: &AssignmentTable) -> Result<()> {
        self.save_doc(unit, &paths::assignments_path(&self.root, unit), table)
    }

    fn get_zen_progress(&self, unit: UnitId) -> Result<ZenProgress> {
        self.load_doc(&paths::zen_progress_path(&self.root, unit))
    }

    fn set_zen_progress(&self, unit: UnitId, progress: &ZenProgress) -> Result<()> {
        self.save_doc(unit, &paths::zen_progress_path(&self.root, unit), progress)
    }

    fn get_update_progress(&self, unit: UnitId) -> Result<UpdateProgress> {
        self.load_doc(&paths::update_progress_path(&self.root, unit))
    }

    fn set_update_progress(&self, unit: UnitId, progress: &UpdateProgress) -> Result<()> {
        self.save_doc(unit, &paths::update_progress_path(&self.root, unit), progress)
    }

    fn get_config(&self, unit: UnitId) -> Result<UnitConfig> {
        self.load_doc(&paths::config_path(&self.root, unit))
    }

    fn set_config(&self, unit: UnitId, config: &UnitConfig) -> Result<()> {
        self.save_doc(unit, &paths::config_path(&self.root, unit), config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use crate::assignment::AssignmentTable;
use crate::config::UnitConfig;
use crate::error::Result;
use crate::progress::{UpdateProgress, ZenProgress};
use crate::types::UnitId;
use std::collections::HashMap;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Per-unit persistence of the four named documents.
///
/// Each get/set is atomic at single-document granularity; read-modify-write
/// consistency across documents is the service's responsibility (it holds the
/// unit lock around whole transactions).
pub trait Store {
    fn get_assignments(&self, unit: UnitId) -> Result<AssignmentTable>;
    fn set_assignments(&self, unit: UnitId, table: &AssignmentTable) -> Result<()>;

    fn get_zen_progress(&self, unit: UnitId) -> Result<ZenProgress>;
    fn set_zen_progress(&self, unit: UnitId, progress: &ZenProgress) -> Result<()>;

    fn get_update_progress(&self, unit: UnitId) -> Result<UpdateProgress>;
    fn set_update_progress(&self, unit: UnitId, progress: &UpdateProgress) -> Result<()>;

    fn get_config(&self, unit: UnitId) -> Result<UnitConfig>;
    fn set_config(&self, unit: UnitId, config: &UnitConfig) -> Result<()>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct UnitDocs {
    assignments: AssignmentTable,
    zen: ZenProgress,
    update: UpdateProgress,
    config: UnitConfig,
}

/// In-process store for tests and embedding. An unseen unit reads back as
/// empty tables and default configuration.
#[derive(Debug, Default)]
pub struct MemoryStore {
    units: Mutex<HashMap<UnitId, UnitDocs>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, unit: UnitId, f: impl FnOnce(&UnitDocs) -> T) -> T {
        let mut units = self.units.lock().unwrap_or_else(|e| e.into_inner());
        f(units.entry(unit).or_default())
    }

    fn write(&self, unit: UnitId, f: impl FnOnce(&mut UnitDocs)) {
        let mut units = self.units.lock().unwrap_or_else(|e| e.into_inner());
        f(units.entry(unit).or_default());
    }
}

impl Store for MemoryStore {
    fn get_assignments(&self, unit: UnitId) -> Result<AssignmentTable> {
        Ok(self.read(unit, |d| d.assignments.clone()))
    }

    fn set_assignments(&self, unit: UnitId, table: &AssignmentTable) -> Result<()> {
        self.write(unit, |d| d.assignments = table.clone());
        Ok(())
    }

    fn get_zen_progress(&self, unit: UnitId) -> Result<ZenProgress> {
        Ok(self.read(unit, |d| d.zen.clone()))
    }

    fn set_zen_progress(&self, unit: UnitId, progress: &ZenProgress) -> Result<()> {
        self.write(unit, |d| d.zen = progress.clone());
        Ok(())
    }

    fn get_update_progress(&self, unit: UnitId) -> Result<UpdateProgress> {
        Ok(self.read(unit, |d| d.update.clone()))
    }

    fn set_update_progress(&self, unit: UnitId, progress: &UpdateProgress) -> Result<()> {
        self.write(unit, |d| d.update = progress.clone());
        Ok(())
    }

    fn get_config(&self, unit: UnitId) -> Result<UnitConfig> {
        Ok(self.read(unit, |d| d.config.clone()))
    }

    fn set_config(&self, unit: UnitId, config: &UnitConfig) -> Result<()> {
        self.write(unit, |d| d.config = config.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

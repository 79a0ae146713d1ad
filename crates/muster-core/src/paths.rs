use crate::types::UnitId;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const MUSTER_DIR: &str = ".muster";
pub const UNITS_DIR: &str = ".muster/units";

pub const ASSIGNMENTS_FILE: &str = "assignments.yaml";
pub const ZEN_PROGRESS_FILE: &str = "zen.yaml";
pub const UPDATE_PROGRESS_FILE: &str = "update.yaml";
pub const CONFIG_FILE: &str = "config.yaml";
pub const META_FILE: &str = "meta.yaml";
pub const ROSTER_FILE: &str = "roster.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn muster_dir(root: &Path) -> PathBuf {
    root.join(MUSTER_DIR)
}

pub fn units_dir(root: &Path) -> PathBuf {
    root.join(UNITS_DIR)
}

pub fn unit_dir(root: &Path, unit: UnitId) -> PathBuf {
    units_dir(root).join(unit.to_string())
}

pub fn assignments_path(root: &Path, unit: UnitId) -> PathBuf {
    unit_dir(root, unit).join(ASSIGNMENTS_FILE)
}

pub fn zen_progress_path(root: &Path, unit: UnitId) -> PathBuf {
    unit_dir(root, unit).join(ZEN_PROGRESS_FILE)
}

pub fn update_progress_path(root: &Path, unit: UnitId) -> PathBuf {
    unit_dir(root, unit).join(UPDATE_PROGRESS_FILE)
}

pub fn config_path(root: &Path, unit: UnitId) -> PathBuf {
    unit_dir(root, unit).join(CONFIG_FILE)
}

pub fn meta_path(root: &Path, unit: UnitId) -> PathBuf {
    unit_dir(root, unit).join(META_FILE)
}

pub fn roster_path(root: &Path, unit: UnitId) -> PathBuf {
    unit_dir(root, unit).join(ROSTER_FILE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

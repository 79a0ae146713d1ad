use muster_core::directory::Directory;
use muster_core::error::{MusterError, Result};
use muster_core::types::{CoordinatorId, SubjectId, UnitId};
use muster_core::{io, paths};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Roster entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorEntry {
    pub id: CoordinatorId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub eligible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectEntry {
    pub id: SubjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// The CLI's membership directory, kept as a per-unit YAML document.
///
/// An entry with `eligible: false` models a member who lost the coordinator
/// role; an id absent from the file models someone who left the unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub coordinators: Vec<CoordinatorEntry>,
    #[serde(default)]
    pub subjects: Vec<SubjectEntry>,
}

impl Roster {
    pub fn load(root: &Path, unit: UnitId) -> Result<Self> {
        if !paths::muster_dir(root).is_dir() {
            return Err(MusterError::NotInitialized);
        }
        let path = paths::roster_path(root, unit);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, root: &Path, unit: UnitId) -> Result<()> {
        if !paths::muster_dir(root).is_dir() {
            return Err(MusterError::NotInitialized);
        }
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::roster_path(root, unit), data.as_bytes())
    }

    /// Add or update a coordinator entry. Returns true if newly added.
    pub fn upsert_coordinator(
        &mut self,
        id: CoordinatorId,
        name: Option<String>,
        eligible: bool,
    ) -> bool {
        if let Some(entry) = self.coordinators.iter_mut().find(|e| e.id == id) {
            if name.is_some() {
                entry.name = name;
            }
            entry.eligible = eligible;
            return false;
        }
        self.coordinators.push(CoordinatorEntry { id, name, eligible });
        true
    }

    pub fn remove_coordinator(&mut self, id: CoordinatorId) -> bool {
        let before = self.coordinators.len();
        self.coordinators.retain(|e| e.id != id);
        self.coordinators.len() != before
    }

    /// Flip eligibility in place. Returns false if the id is not on the
    /// roster.
    pub fn set_eligible(&mut self, id: CoordinatorId, eligible: bool) -> bool {
        match self.coordinators.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.eligible = eligible;
                true
            }
            None => false,
        }
    }

    pub fn upsert_subject(&mut self, id: SubjectId, name: Option<String>) -> bool {
        if let Some(entry) = self.subjects.iter_mut().find(|e| e.id == id) {
            if name.is_some() {
                entry.name = name;
            }
            return false;
        }
        self.subjects.push(SubjectEntry { id, name });
        true
    }

    pub fn remove_subject(&mut self, id: SubjectId) -> bool {
        let before = self.subjects.len();
        self.subjects.retain(|e| e.id != id);
        self.subjects.len() != before
    }

    pub fn coordinator_name(&self, id: CoordinatorId) -> Option<&str> {
        self.coordinators
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.name.as_deref())
    }

    pub fn subject_name(&self, id: SubjectId) -> Option<&str> {
        self.subjects
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.name.as_deref())
    }
}

impl Directory for Roster {
    fn list_coordinators(&self) -> Vec<CoordinatorId> {
        self.coordinators
            .iter()
            .filter(|e| e.eligible)
            .map(|e| e.id)
            .collect()
    }

    fn list_subjects(&self) -> Vec<SubjectId> {
        self.subjects.iter().map(|e| e.id).collect()
    }

    fn is_eligible_coordinator(&self, id: CoordinatorId) -> bool {
        self.coordinators
            .iter()
            .any(|e| e.id == id && e.eligible)
    }

    fn is_member(&self, id: CoordinatorId) -> bool {
        self.coordinators.iter().any(|e| e.id == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use crate::types::{CoordinatorId, SubjectId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// AssignmentTable
// ---------------------------------------------------------------------------

/// Coordinator → ordered list of assigned subjects.
///
/// A subject appears at most once per coordinator (enforced by `assign`), but
/// may legitimately appear under several coordinators — that is the
/// redundancy stripe. Persisted as a plain YAML mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentTable {
    entries: BTreeMap<CoordinatorId, Vec<SubjectId>>,
}

impl AssignmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of coordinator keys (including those with empty lists).
    pub fn coordinator_count(&self) -> usize {
        self.entries.len()
    }

    pub fn coordinators(&self) -> impl Iterator<Item = CoordinatorId> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CoordinatorId, &[SubjectId])> {
        self.entries.iter().map(|(c, s)| (*c, s.as_slice()))
    }

    pub fn has_coordinator(&self, coordinator: CoordinatorId) -> bool {
        self.entries.contains_key(&coordinator)
    }

    /// Subjects assigned to `coordinator`, in assignment order. Empty slice if
    /// the coordinator is not a key.
    pub fn subjects_of(&self, coordinator: CoordinatorId) -> &[SubjectId] {
        self.entries
            .get(&coordinator)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, coordinator: CoordinatorId, subject: SubjectId) -> bool {
        self.subjects_of(coordinator).contains(&subject)
    }

    /// Insert the coordinator key with an empty list if absent.
    pub fn ensure_coordinator(&mut self, coordinator: CoordinatorId) {
        self.entries.entry(coordinator).or_default();
    }

    /// Append `subject` to the coordinator's list unless already present.
    /// Creates the coordinator key if needed. Returns true if newly added.
    pub fn assign(&mut self, coordinator: CoordinatorId, subject: SubjectId) -> bool {
        let list = self.entries.entry(coordinator).or_default();
        if list.contains(&subject) {
            return false;
        }
        list.push(subject);
        true
    }

    /// Remove `subject` from the coordinator's list. Returns true if it was
    /// present. The coordinator key is kept even if its list becomes empty.
    pub fn unassign(&mut self, coordinator: CoordinatorId, subject: SubjectId) -> bool {
        match self.entries.get_mut(&coordinator) {
            Some(list) => {
                let before = list.len();
                list.retain(|s| *s != subject);
                list.len() != before
            }
            None => false,
        }
    }

    /// Drop a coordinator key entirely, returning its former list.
    pub fn remove_coordinator(&mut self, coordinator: CoordinatorId) -> Option<Vec<SubjectId>> {
        self.entries.remove(&coordinator)
    }

    /// Every coordinator currently holding `subject`, in key order.
    pub fn holders_of(&self, subject: SubjectId) -> Vec<CoordinatorId> {
        self.entries
            .iter()
            .filter(|(_, subjects)| subjects.contains(&subject))
            .map(|(c, _)| *c)
            .collect()
    }

    /// Distinct subjects assigned to at least one coordinator.
    pub fn distinct_subjects(&self) -> BTreeSet<SubjectId> {
        self.entries.values().flatten().copied().collect()
    }

    /// Total assignment slots, counted with multiplicity.
    pub fn slot_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use crate::assignment::AssignmentTable;
use crate::types::{CoordinatorId, SubjectId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// ZenProgress
// ---------------------------------------------------------------------------

/// Per-coordinator first-contact ("zen") progress: coordinator → subject →
/// contacted flag. An entry is created `false` when the assignment is created;
/// absence means "not yet contacted", not "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZenProgress {
    entries: BTreeMap<CoordinatorId, BTreeMap<SubjectId, bool>>,
}

impl ZenProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the entry as `false` if no entry exists for the pair. Existing
    /// values (true or false) are never overwritten.
    pub fn init_pair(&mut self, coordinator: CoordinatorId, subject: SubjectId) {
        self.entries
            .entry(coordinator)
            .or_default()
            .entry(subject)
            .or_insert(false);
    }

    /// Record first contact. Deliberately lenient: the pair is recorded even
    /// if the subject was never assigned to this coordinator (out-of-band
    /// contact), which feeds into the contacted count.
    pub fn mark(&mut self, coordinator: CoordinatorId, subject: SubjectId) {
        self.entries
            .entry(coordinator)
            .or_default()
            .insert(subject, true);
    }

    pub fn is_contacted(&self, coordinator: CoordinatorId, subject: SubjectId) -> bool {
        self.entries
            .get(&coordinator)
            .and_then(|m| m.get(&subject))
            .copied()
            .unwrap_or(false)
    }

    /// Number of `true` flags recorded for the coordinator, including
    /// out-of-band marks.
    pub fn contacted_count(&self, coordinator: CoordinatorId) -> usize {
        self.entries
            .get(&coordinator)
            .map(|m| m.values().filter(|v| **v).count())
            .unwrap_or(0)
    }

    pub fn remove_coordinator(&mut self, coordinator: CoordinatorId) {
        self.entries.remove(&coordinator);
    }

    /// Remove the single pair entry, returning the previous flag if any.
    pub fn remove_pair(&mut self, coordinator: CoordinatorId, subject: SubjectId) -> Option<bool> {
        self.entries
            .get_mut(&coordinator)
            .and_then(|m| m.remove(&subject))
    }
}

// ---------------------------------------------------------------------------
// UpdateProgress
// ---------------------------------------------------------------------------

/// Per-subject campaign-round progress: subject → coordinators who have
/// contacted them this round, in order of first contact. Independent of the
/// assignment table; reset only by explicit administrative action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateProgress {
    entries: BTreeMap<SubjectId, Vec<CoordinatorId>>,
}

impl UpdateProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a contact. Idempotent; order of first contact is preserved.
    /// Returns true if this was the coordinator's first recorded contact.
    pub fn record(&mut self, subject: SubjectId, coordinator: CoordinatorId) -> bool {
        let list = self.entries.entry(subject).or_default();
        if list.contains(&coordinator) {
            return false;
        }
        list.push(coordinator);
        true
    }

    pub fn contacts(&self, subject: SubjectId) -> &[CoordinatorId] {
        self.entries
            .get(&subject)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_contacted(&self, subject: SubjectId, coordinator: CoordinatorId) -> bool {
        self.contacts(subject).contains(&coordinator)
    }

    /// Administrative round reset.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Zen-round completion summary for one coordinator.
///
/// `percent` is `None` when `total` is zero ("n/a" — never a division by
/// zero). Out-of-band marks count toward `contacted`, so `percent` can exceed
/// 100.0; `remaining` saturates at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinatorStats {
    pub total: usize,
    pub contacted: usize,
    pub remaining: usize,
    pub percent: Option<f64>,
}

pub fn stats(
    assignments: &AssignmentTable,
    zen: &ZenProgress,
    coordinator: CoordinatorId,
) -> CoordinatorStats {
    let total = assignments.subjects_of(coordinator).len();
    let contacted = zen.contacted_count(coordinator);
    let percent = if total == 0 {
        None
    } else {
        let raw = contacted as f64 / total as f64 * 100.0;
        Some((raw * 10.0).round() / 10.0)
    };
    CoordinatorStats {
        total,
        contacted,
        remaining: total.saturating_sub(contacted),
        percent,
    }
}

/// Coordinators holding `subject`, with their zen contact flag, sorted by
/// coordinator id. (Human-friendly ordering is the presentation layer's job.)
pub fn who_is_assigned(
    assignments: &AssignmentTable,
    zen: &ZenProgress,
    subject: SubjectId,
) -> Vec<(CoordinatorId, bool)> {
    assignments
        .holders_of(subject)
        .into_iter()
        .map(|c| (c, zen.is_contacted(c, subject)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use crate::types::{CoordinatorId, SubjectId};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// Membership and eligibility, supplied fresh on every call that needs it.
/// The engine never caches any of this.
pub trait Directory {
    /// Everyone currently eligible to coordinate.
    fn list_coordinators(&self) -> Vec<CoordinatorId>;

    /// The current subject population.
    fn list_subjects(&self) -> Vec<SubjectId>;

    /// Whether `id` currently qualifies as a coordinator. False covers both
    /// "lost the required role" and "left the unit".
    fn is_eligible_coordinator(&self, id: CoordinatorId) -> bool;

    /// Whether `id` is still a member of the unit at all. Lets reconciliation
    /// report "lost the role" separately from "left the unit".
    fn is_member(&self, id: CoordinatorId) -> bool;

    fn is_subject(&self, id: SubjectId) -> bool {
        self.list_subjects().contains(&id)
    }
}

// ---------------------------------------------------------------------------
// StaticDirectory
// ---------------------------------------------------------------------------

/// Fixed-membership directory for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    coordinators: Vec<CoordinatorId>,
    subjects: Vec<SubjectId>,
    members: BTreeSet<CoordinatorId>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add eligible coordinators (implies membership).
    pub fn with_coordinators(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        for id in ids {
            self.coordinators.push(CoordinatorId(id));
            self.members.insert(CoordinatorId(id));
        }
        self
    }

    pub fn with_subjects(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.subjects.extend(ids.into_iter().map(SubjectId));
        self
    }

    /// Add a member who does not hold the coordinator role (demoted).
    pub fn with_member(mut self, id: u64) -> Self {
        self.members.insert(CoordinatorId(id));
        self
    }
}

impl Directory for StaticDirectory {
    fn list_coordinators(&self) -> Vec<CoordinatorId> {
        self.coordinators.clone()
    }

    fn list_subjects(&self) -> Vec<SubjectId> {
        self.subjects.clone()
    }

    fn is_eligible_coordinator(&self, id: CoordinatorId) -> bool {
        self.coordinators.contains(&id)
    }

    fn is_member(&self, id: CoordinatorId) -> bool {
        self.members.contains(&id)
    }
}

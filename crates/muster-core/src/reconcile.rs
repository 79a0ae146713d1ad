use crate::assignment::AssignmentTable;
use crate::directory::Directory;
use crate::error::{MusterError, Result};
use crate::progress::ZenProgress;
use crate::stripe;
use crate::types::{CoordinatorId, SubjectId};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

// ---------------------------------------------------------------------------
// Invalid-coordinator detection
// ---------------------------------------------------------------------------

/// A coordinator key in the assignment table whose id no longer qualifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidCoordinator {
    pub id: CoordinatorId,
    /// True when the id is still a unit member (lost the role); false when it
    /// left the unit entirely.
    pub was_member: bool,
    pub subject_count: usize,
}

/// Classify every coordinator key against the directory. Read-only.
pub fn find_invalid(
    assignments: &AssignmentTable,
    directory: &dyn Directory,
) -> Vec<InvalidCoordinator> {
    assignments
        .iter()
        .filter(|(id, _)| !directory.is_eligible_coordinator(*id))
        .map(|(id, subjects)| InvalidCoordinator {
            id,
            was_member: directory.is_member(id),
            subject_count: subjects.len(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Repair
// ---------------------------------------------------------------------------

/// Remove `invalid` coordinators and re-stripe their orphaned subjects across
/// `valid`, without disturbing the survivors' existing assignments.
///
/// All-or-nothing: an empty `valid` set fails with `NoEligibleTargets` before
/// anything is touched. Returns the new tables and the count of distinct
/// orphaned subjects, irrespective of how many coordinator slots they landed
/// in.
pub fn repair(
    assignments: &AssignmentTable,
    zen: &ZenProgress,
    invalid: &[CoordinatorId],
    valid: &[CoordinatorId],
    stripe_count: u32,
    rng: &mut impl Rng,
) -> Result<(AssignmentTable, ZenProgress, usize)> {
    if valid.is_empty() {
        return Err(MusterError::NoEligibleTargets);
    }

    let orphans: BTreeSet<SubjectId> = invalid
        .iter()
        .flat_map(|&c| assignments.subjects_of(c).iter().copied())
        .collect();

    let mut new_assignments = assignments.clone();
    let mut new_zen = zen.clone();
    for &c in invalid {
        new_assignments.remove_coordinator(c);
        new_zen.remove_coordinator(c);
    }

    let orphan_list: Vec<SubjectId> = orphans.into_iter().collect();
    let restriped = stripe::stripe(valid, &orphan_list, stripe_count, rng);

    // Merge pair-wise: a valid coordinator may already hold an orphaned
    // subject from before, and may already have a progress flag for it.
    for (coordinator, subjects) in restriped.iter() {
        for &subject in subjects {
            new_assignments.assign(coordinator, subject);
            new_zen.init_pair(coordinator, subject);
        }
    }

    debug!(
        removed = invalid.len(),
        reassigned = orphan_list.len(),
        targets = valid.len(),
        "repaired assignment table"
    );
    Ok((new_assignments, new_zen, orphan_list.len()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::StaticDirectory;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn c(id: u64) -> CoordinatorId {
        CoordinatorId(id)
    }

    fn s(id: u64) -> SubjectId {
        SubjectId(id)
    }

    fn fixture() -> (AssignmentTable, ZenProgress) {
        // A invalid with [1,2]; B valid with [3]; C valid with [4].
        let mut table = AssignmentTable::new();
        table.assign(c(1), s(1));
        table.assign(c(1), s(2));
        table.assign(c(2), s(3));
        table.assign(c(3), s(4));
        let mut zen = ZenProgress::new();
        for (co, su) in [(1, 1), (1, 2), (2, 3), (3, 4)] {
            zen.init_pair(c(co), s(su));
        }
        zen.mark(c(2), s(3));
        (table, zen)
    }

    #[test]
    fn find_invalid_classifies_against_directory() {
        let (table, _) = fixture();
        let dir = StaticDirectory::new()
            .with_coordinators([2, 3])
            .with_member(1);
        let invalid = find_invalid(&table, &dir);
        assert_eq!(
            invalid,
            vec![InvalidCoordinator {
                id: c(1),
                was_member: true,
                subject_count: 2,
            }]
        );
    }

    #[test]
    fn find_invalid_flags_departed_members() {
        let (table, _) = fixture();
        let dir = StaticDirectory::new().with_coordinators([2, 3]);
        let invalid = find_invalid(&table, &dir);
        assert_eq!(invalid.len(), 1);
        assert!(!invalid[0].was_member);
    }

    #[test]
    fn repair_redistributes_only_orphans() {
        let (table, zen) = fixture();
        let mut rng = StdRng::seed_from_u64(3);
        let (new_table, new_zen, reassigned) =
            repair(&table, &zen, &[c(1)], &[c(2), c(3)], 1, &mut rng).unwrap();

        assert_eq!(reassigned, 2);
        assert!(!new_table.has_coordinator(c(1)));
        // Survivors keep their original subjects.
        assert!(new_table.contains(c(2), s(3)));
        assert!(new_table.contains(c(3), s(4)));
        // Orphans 1 and 2 land somewhere among the valid pool, once each.
        for orphan in [s(1), s(2)] {
            assert_eq!(new_table.holders_of(orphan).len(), 1);
        }
        // Coverage is preserved: all four subjects still assigned somewhere.
        assert_eq!(new_table.distinct_subjects().len(), 4);
        // The surviving progress flag was not reset.
        assert!(new_zen.is_contacted(c(2), s(3)));
    }

    #[test]
    fn repair_does_not_duplicate_preexisting_assignment() {
        // B already holds subject 1, which is also orphaned by A's removal.
        let mut table = AssignmentTable::new();
        table.assign(c(1), s(1));
        table.assign(c(2), s(1));
        let mut zen = ZenProgress::new();
        zen.init_pair(c(1), s(1));
        zen.mark(c(2), s(1));

        let mut rng = StdRng::seed_from_u64(8);
        let (new_table, new_zen, reassigned) =
            repair(&table, &zen, &[c(1)], &[c(2)], 3, &mut rng).unwrap();

        assert_eq!(reassigned, 1);
        assert_eq!(new_table.subjects_of(c(2)), &[s(1)]);
        // The existing true flag survives the merge.
        assert!(new_zen.is_contacted(c(2), s(1)));
    }

    #[test]
    fn repair_with_no_valid_targets_changes_nothing() {
        let (table, zen) = fixture();
        let mut rng = StdRng::seed_from_u64(3);
        let err = repair(&table, &zen, &[c(1)], &[], 1, &mut rng).unwrap_err();
        assert!(matches!(err, MusterError::NoEligibleTargets));
        // Inputs are borrowed immutably; nothing to roll back by construction.
    }

    #[test]
    fn repair_with_no_invalid_is_a_fixpoint() {
        let (table, zen) = fixture();
        let mut rng = StdRng::seed_from_u64(3);
        let (new_table, new_zen, reassigned) =
            repair(&table, &zen, &[], &[c(2), c(3)], 1, &mut rng).unwrap();
        assert_eq!(reassigned, 0);
        assert_eq!(new_table, table);
        assert_eq!(new_zen, zen);
    }
}

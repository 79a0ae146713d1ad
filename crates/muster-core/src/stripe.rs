use crate::assignment::AssignmentTable;
use crate::types::{CoordinatorId, SubjectId};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Distribute `subjects` redundantly across `coordinators`.
///
/// The subject list is shuffled (uniform permutation from `rng`) to avoid
/// positional bias, then the subject at shuffled position `i` is assigned to
/// coordinators `(i*k + j) mod N` for `j in 0..k`. With `k <= N` those
/// indices are distinct, so every subject lands on exactly `min(k, N)`
/// coordinators; with `k > N` the modulo wraps onto already-chosen indices
/// and the subject gets only `N`. That collapse is accepted, not guarded.
///
/// An empty coordinator set yields an empty mapping. Otherwise every
/// coordinator appears as a key, possibly with an empty list (no subjects, or
/// `stripe_count == 0`).
pub fn stripe(
    coordinators: &[CoordinatorId],
    subjects: &[SubjectId],
    stripe_count: u32,
    rng: &mut impl Rng,
) -> AssignmentTable {
    let mut table = AssignmentTable::new();
    if coordinators.is_empty() {
        return table;
    }
    for &c in coordinators {
        table.ensure_coordinator(c);
    }

    let mut order: Vec<SubjectId> = subjects.to_vec();
    order.shuffle(rng);

    let n = coordinators.len();
    let k = stripe_count as usize;
    for (i, &subject) in order.iter().enumerate() {
        for j in 0..k {
            // assign() deduplicates, so the k > N wrap collapses naturally.
            table.assign(coordinators[(i * k + j) % n], subject);
        }
    }

    debug!(
        coordinators = n,
        subjects = subjects.len(),
        stripe_count,
        slots = table.slot_count(),
        "striped subjects across coordinators"
    );
    table
}

/// Uniform sample of `min(stripe_count, len)` coordinators without
/// replacement, for assigning a single newly-arrived subject.
pub fn pick_targets(
    eligible: &[CoordinatorId],
    stripe_count: u32,
    rng: &mut impl Rng,
) -> Vec<CoordinatorId> {
    let k = (stripe_count as usize).min(eligible.len());
    eligible.choose_multiple(rng, k).copied().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use crate::assignment::AssignmentTable;
use crate::config::UnitConfig;
use crate::directory::Directory;
use crate::error::{MusterError, Result};
use crate::progress::{self, CoordinatorStats, UpdateProgress, ZenProgress};
use crate::reconcile::{self, InvalidCoordinator};
use crate::store::Store;
use crate::stripe;
use crate::types::{CoordinatorId, SubjectId, UnitId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

// ---------------------------------------------------------------------------
// Operation summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SetupSummary {
    pub coordinators: usize,
    pub subjects: usize,
    pub stripe_count: u32,
}

/// A subject with zero eligible coordinators stays unassigned; that is a
/// valid state callers branch on, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ArrivalOutcome {
    Assigned { coordinators: Vec<CoordinatorId> },
    NoEligibleCoordinators,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepairSummary {
    pub removed: Vec<InvalidCoordinator>,
    pub reassigned_subjects: usize,
}

// ---------------------------------------------------------------------------
// Muster
// ---------------------------------------------------------------------------

/// The engine facade: owns the store, a per-unit lock registry, and the
/// random source.
///
/// Every mutating operation is an atomic read-modify-write transaction under
/// its unit's lock; operations on different units never block each other.
/// Reads spanning more than one document take the same lock so they observe a
/// consistent snapshot. Membership is never cached — a `Directory` is passed
/// into each call that needs one.
pub struct Muster<S: Store, R: Rng = StdRng> {
    store: S,
    rng: Mutex<R>,
    locks: Mutex<HashMap<UnitId, Arc<Mutex<()>>>>,
}

impl<S: Store> Muster<S, StdRng> {
    pub fn new(store: S) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }
}

impl<S: Store, R: Rng> Muster<S, R> {
    /// Construct with an explicit random source (tests seed a `StdRng`).
    pub fn with_rng(store: S, rng: R) -> Self {
        Self {
            store,
            rng: Mutex::new(rng),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn unit_lock(&self, unit: UnitId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(unit).or_default().clone()
    }

    fn rng(&self) -> MutexGuard<'_, R> {
        self.rng.lock().unwrap_or_else(|e| e.into_inner())
    }

    // -----------------------------------------------------------------------
    // Assignment lifecycle
    // -----------------------------------------------------------------------

    /// Full re-stripe over the directory's current population. Replaces the
    /// assignment and zen tables wholesale; the update round is untouched.
    pub fn setup(&self, unit: UnitId, directory: &dyn Directory) -> Result<SetupSummary> {
        let lock = self.unit_lock(unit);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let coordinators = directory.list_coordinators();
        let subjects = directory.list_subjects();
        let config = self.store.get_config(unit)?;

        let table = stripe::stripe(
            &coordinators,
            &subjects,
            config.stripe_count,
            &mut *self.rng(),
        );
        let mut zen = ZenProgress::new();
        for (c, list) in table.iter() {
            for &s in list {
                zen.init_pair(c, s);
            }
        }

        self.store.set_assignments(unit, &table)?;
        self.store.set_zen_progress(unit, &zen)?;
        info!(
            %unit,
            coordinators = coordinators.len(),
            subjects = subjects.len(),
            stripe_count = config.stripe_count,
            "initial striping complete"
        );
        Ok(SetupSummary {
            coordinators: coordinators.len(),
            subjects: subjects.len(),
            stripe_count: config.stripe_count,
        })
    }

    /// Incremental assignment for one newly-arrived subject.
    pub fn subject_arrived(
        &self,
        unit: UnitId,
        subject: SubjectId,
        directory: &dyn Directory,
    ) -> Result<ArrivalOutcome> {
        let lock = self.unit_lock(unit);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let eligible = directory.list_coordinators();
        if eligible.is_empty() {
            return Ok(ArrivalOutcome::NoEligibleCoordinators);
        }

        let config = self.store.get_config(unit)?;
        let mut targets = stripe::pick_targets(&eligible, config.stripe_count, &mut *self.rng());
        targets.sort();

        let mut table = self.store.get_assignments(unit)?;
        let mut zen = self.store.get_zen_progress(unit)?;
        for &c in &targets {
            table.assign(c, subject);
            zen.init_pair(c, subject);
        }
        self.store.set_assignments(unit, &table)?;
        self.store.set_zen_progress(unit, &zen)?;
        info!(%unit, %subject, targets = targets.len(), "assigned arriving subject");
        Ok(ArrivalOutcome::Assigned {
            coordinators: targets,
        })
    }

    /// Move one subject from one coordinator's list to another's, carrying
    /// no progress over: the source entry is dropped and the target entry is
    /// created false only if the target never had one.
    pub fn reassign_subject(
        &self,
        unit: UnitId,
        subject: SubjectId,
        from: CoordinatorId,
        to: CoordinatorId,
        directory: &dyn Directory,
    ) -> Result<()> {
        if !directory.is_subject(subject) {
            return Err(MusterError::UnknownSubject(subject));
        }
        if !directory.is_eligible_coordinator(to) {
            return Err(MusterError::UnknownCoordinator(to));
        }

        let lock = self.unit_lock(unit);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut table = self.store.get_assignments(unit)?;
        if !table.contains(from, subject) {
            return Err(MusterError::NotAssigned {
                subject,
                coordinator: from,
            });
        }
        if from == to {
            return Ok(());
        }

        let mut zen = self.store.get_zen_progress(unit)?;
        table.unassign(from, subject);
        table.assign(to, subject);
        zen.remove_pair(from, subject);
        zen.init_pair(to, subject);

        self.store.set_assignments(unit, &table)?;
        self.store.set_zen_progress(unit, &zen)?;
        info!(%unit, %subject, %from, %to, "reassigned subject");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------------

    /// Classify assignment-table coordinators against the directory.
    /// Read-only.
    pub fn check(&self, unit: UnitId, directory: &dyn Directory) -> Result<Vec<InvalidCoordinator>> {
        let table = self.store.get_assignments(unit)?;
        Ok(reconcile::find_invalid(&table, directory))
    }

    /// Remove invalidated coordinators and re-stripe their subjects across
    /// the currently eligible pool. No-op when nothing is invalid.
    pub fn repair(&self, unit: UnitId, directory: &dyn Directory) -> Result<RepairSummary> {
        let lock = self.unit_lock(unit);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let table = self.store.get_assignments(unit)?;
        let zen = self.store.get_zen_progress(unit)?;
        let invalid = reconcile::find_invalid(&table, directory);
        if invalid.is_empty() {
            return Ok(RepairSummary {
                removed: Vec::new(),
                reassigned_subjects: 0,
            });
        }

        let invalid_ids: Vec<CoordinatorId> = invalid.iter().map(|i| i.id).collect();
        let valid = directory.list_coordinators();
        let config = self.store.get_config(unit)?;
        let (new_table, new_zen, reassigned) = reconcile::repair(
            &table,
            &zen,
            &invalid_ids,
            &valid,
            config.stripe_count,
            &mut *self.rng(),
        )?;

        self.store.set_assignments(unit, &new_table)?;
        self.store.set_zen_progress(unit, &new_zen)?;
        info!(
            %unit,
            removed = invalid_ids.len(),
            reassigned,
            "reconciliation repair complete"
        );
        Ok(RepairSummary {
            removed: invalid,
            reassigned_subjects: reassigned,
        })
    }

    // -----------------------------------------------------------------------
    // Progress
    // -----------------------------------------------------------------------

    /// Record first contact. Lenient by contract: the pair is recorded even
    /// when the subject is not assigned to the coordinator.
    pub fn mark_zen_contacted(
        &self,
        unit: UnitId,
        coordinator: CoordinatorId,
        subject: SubjectId,
    ) -> Result<()> {
        let lock = self.unit_lock(unit);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut zen = self.store.get_zen_progress(unit)?;
        zen.mark(coordinator, subject);
        self.store.set_zen_progress(unit, &zen)
    }

    /// Record an update-round contact. Both ids must resolve in the
    /// directory; assignment is deliberately not required.
    pub fn mark_update_contacted(
        &self,
        unit: UnitId,
        subject: SubjectId,
        coordinator: CoordinatorId,
        directory: &dyn Directory,
    ) -> Result<()> {
        if !directory.is_member(coordinator) {
            return Err(MusterError::UnknownCoordinator(coordinator));
        }
        if !directory.is_subject(subject) {
            return Err(MusterError::UnknownSubject(subject));
        }

        let lock = self.unit_lock(unit);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut update = self.store.get_update_progress(unit)?;
        update.record(subject, coordinator);
        self.store.set_update_progress(unit, &update)
    }

    /// Administrative reset of the campaign round.
    pub fn reset_update_round(&self, unit: UnitId) -> Result<()> {
        let lock = self.unit_lock(unit);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        self.store.set_update_progress(unit, &UpdateProgress::new())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn stats(&self, unit: UnitId, coordinator: CoordinatorId) -> Result<CoordinatorStats> {
        let lock = self.unit_lock(unit);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let table = self.store.get_assignments(unit)?;
        let zen = self.store.get_zen_progress(unit)?;
        Ok(progress::stats(&table, &zen, coordinator))
    }

    /// Stats for every coordinator key in the table, in id order.
    pub fn all_stats(&self, unit: UnitId) -> Result<Vec<(CoordinatorId, CoordinatorStats)>> {
        let lock = self.unit_lock(unit);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let table = self.store.get_assignments(unit)?;
        let zen = self.store.get_zen_progress(unit)?;
        Ok(table
            .coordinators()
            .map(|c| (c, progress::stats(&table, &zen, c)))
            .collect())
    }

    pub fn who_is_assigned(
        &self,
        unit: UnitId,
        subject: SubjectId,
    ) -> Result<Vec<(CoordinatorId, bool)>> {
        let lock = self.unit_lock(unit);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let table = self.store.get_assignments(unit)?;
        let zen = self.store.get_zen_progress(unit)?;
        Ok(progress::who_is_assigned(&table, &zen, subject))
    }

    /// Coordinators who contacted the subject this round, first contact
    /// first.
    pub fn update_contacts(&self, unit: UnitId, subject: SubjectId) -> Result<Vec<CoordinatorId>> {
        let update = self.store.get_update_progress(unit)?;
        Ok(update.contacts(subject).to_vec())
    }

    // -----------------------------------------------------------------------
    // Message rosters (the Notifier collaborator delivers these; the engine
    // only produces the pairs)
    // -----------------------------------------------------------------------

    /// The coordinator's assigned subjects still awaiting first contact,
    /// paired with the rendered zen template.
    pub fn zen_roster(
        &self,
        unit: UnitId,
        coordinator: CoordinatorId,
    ) -> Result<Vec<(SubjectId, String)>> {
        let lock = self.unit_lock(unit);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let table = self.store.get_assignments(unit)?;
        let zen = self.store.get_zen_progress(unit)?;
        let config = self.store.get_config(unit)?;
        Ok(table
            .subjects_of(coordinator)
            .iter()
            .filter(|&&s| !zen.is_contacted(coordinator, s))
            .map(|&s| (s, config.render_zen(s)))
            .collect())
    }

    /// The coordinator's assigned subjects that nobody has reached this
    /// update round, paired with the rendered whip template.
    pub fn whip_roster(
        &self,
        unit: UnitId,
        coordinator: CoordinatorId,
    ) -> Result<Vec<(SubjectId, String)>> {
        let lock = self.unit_lock(unit);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let table = self.store.get_assignments(unit)?;
        let update = self.store.get_update_progress(unit)?;
        let config = self.store.get_config(unit)?;
        Ok(table
            .subjects_of(coordinator)
            .iter()
            .filter(|&&s| update.contacts(s).is_empty())
            .map(|&s| (s, config.render_whip(s)))
            .collect())
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    pub fn config(&self, unit: UnitId) -> Result<UnitConfig> {
        self.store.get_config(unit)
    }

    pub fn set_stripe_count(&self, unit: UnitId, stripe_count: u32) -> Result<()> {
        self.update_config(unit, |c| c.stripe_count = stripe_count)
    }

    pub fn set_zen_template(&self, unit: UnitId, template: impl Into<String>) -> Result<()> {
        let template = template.into();
        self.update_config(unit, |c| c.zen_template = template)
    }

    pub fn set_whip_template(&self, unit: UnitId, template: impl Into<String>) -> Result<()> {
        let template = template.into();
        self.update_config(unit, |c| c.whip_template = template)
    }

    fn update_config(&self, unit: UnitId, f: impl FnOnce(&mut UnitConfig)) -> Result<()> {
        let lock = self.unit_lock(unit);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut config = self.store.get_config(unit)?;
        f(&mut config);
        self.store.set_config(unit, &config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

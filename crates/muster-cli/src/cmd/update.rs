use crate::output::{print_json, print_table};
use crate::roster::Roster;
use anyhow::Context;
use clap::Subcommand;
use muster_core::types::{CoordinatorId, SubjectId, UnitId};
use std::path::Path;

#[derive(Subcommand)]
pub enum UpdateSubcommand {
    /// Record that a coordinator reached a subject this round
    Mark {
        subject: SubjectId,
        coordinator: CoordinatorId,
    },
    /// Who has reached a subject this round, first contact first
    Status { subject: SubjectId },
    /// Administrative reset: start a fresh round
    Reset,
    /// A coordinator's subjects nobody has reached this round
    Roster { coordinator: CoordinatorId },
}

pub fn run(root: &Path, unit: UnitId, subcmd: UpdateSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        UpdateSubcommand::Mark {
            subject,
            coordinator,
        } => mark(root, unit, subject, coordinator),
        UpdateSubcommand::Status { subject } => status(root, unit, subject, json),
        UpdateSubcommand::Reset => reset(root, unit),
        UpdateSubcommand::Roster { coordinator } => roster(root, unit, coordinator, json),
    }
}

fn mark(
    root: &Path,
    unit: UnitId,
    subject: SubjectId,
    coordinator: CoordinatorId,
) -> anyhow::Result<()> {
    let names = Roster::load(root, unit)?;
    let svc = super::service(root);
    svc.mark_update_contacted(unit, subject, coordinator, &names)
        .with_context(|| format!("failed to record update contact for {subject}"))?;
    println!("recorded update contact: {coordinator} -> {subject}");
    Ok(())
}

fn status(root: &Path, unit: UnitId, subject: SubjectId, json: bool) -> anyhow::Result<()> {
    let names = Roster::load(root, unit)?;
    let svc = super::service(root);
    let contacts = svc.update_contacts(unit, subject)?;

    if json {
        return print_json(&contacts);
    }

    if contacts.is_empty() {
        println!("nobody has reached {subject} this round");
        return Ok(());
    }
    let rows = contacts
        .into_iter()
        .map(|id| {
            vec![
                id.to_string(),
                names.coordinator_name(id).unwrap_or("-").to_string(),
            ]
        })
        .collect();
    print_table(&["COORDINATOR", "NAME"], rows);
    Ok(())
}

fn reset(root: &Path, unit: UnitId) -> anyhow::Result<()> {
    let svc = super::service(root);
    svc.reset_update_round(unit)?;
    println!("update round reset");
    Ok(())
}

fn roster(
    root: &Path,
    unit: UnitId,
    coordinator: CoordinatorId,
    json: bool,
) -> anyhow::Result<()> {
    let names = Roster::load(root, unit)?;
    let svc = super::service(root);
    let pending = svc.whip_roster(unit, coordinator)?;

    if json {
        #[derive(serde::Serialize)]
        struct Pending {
            subject: SubjectId,
            message: String,
        }
        let out: Vec<Pending> = pending
            .into_iter()
            .map(|(subject, message)| Pending { subject, message })
            .collect();
        return print_json(&out);
    }

    if pending.is_empty() {
        println!("every subject assigned to {coordinator} has been reached this round");
        return Ok(());
    }
    let rows = pending
        .into_iter()
        .map(|(subject, message)| {
            vec![
                subject.to_string(),
                names.subject_name(subject).unwrap_or("-").to_string(),
                message,
            ]
        })
        .collect();
    print_table(&["SUBJECT", "NAME", "MESSAGE"], rows);
    Ok(())
}

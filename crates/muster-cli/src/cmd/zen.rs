use crate::output::{fmt_percent, print_json, print_table};
use crate::roster::Roster;
use clap::Subcommand;
use muster_core::types::{CoordinatorId, SubjectId, UnitId};
use std::path::Path;

#[derive(Subcommand)]
pub enum ZenSubcommand {
    /// Record first contact (allowed even for unassigned pairs)
    Mark {
        coordinator: CoordinatorId,
        subject: SubjectId,
    },
    /// Completion stats, for one coordinator or the whole table
    Stats { coordinator: Option<CoordinatorId> },
    /// A coordinator's uncontacted subjects with rendered messages
    Roster { coordinator: CoordinatorId },
}

pub fn run(root: &Path, unit: UnitId, subcmd: ZenSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ZenSubcommand::Mark {
            coordinator,
            subject,
        } => mark(root, unit, coordinator, subject),
        ZenSubcommand::Stats { coordinator } => stats(root, unit, coordinator, json),
        ZenSubcommand::Roster { coordinator } => roster(root, unit, coordinator, json),
    }
}

fn mark(
    root: &Path,
    unit: UnitId,
    coordinator: CoordinatorId,
    subject: SubjectId,
) -> anyhow::Result<()> {
    let svc = super::service(root);
    svc.mark_zen_contacted(unit, coordinator, subject)?;
    println!("recorded first contact: {coordinator} -> {subject}");
    Ok(())
}

fn stats(
    root: &Path,
    unit: UnitId,
    coordinator: Option<CoordinatorId>,
    json: bool,
) -> anyhow::Result<()> {
    let roster = Roster::load(root, unit)?;
    let svc = super::service(root);

    let entries = match coordinator {
        Some(id) => vec![(id, svc.stats(unit, id)?)],
        None => svc.all_stats(unit)?,
    };

    if json {
        #[derive(serde::Serialize)]
        struct Row {
            coordinator: CoordinatorId,
            #[serde(flatten)]
            stats: muster_core::progress::CoordinatorStats,
        }
        let out: Vec<Row> = entries
            .into_iter()
            .map(|(coordinator, stats)| Row { coordinator, stats })
            .collect();
        return print_json(&out);
    }

    let rows = entries
        .into_iter()
        .map(|(id, s)| {
            vec![
                id.to_string(),
                roster.coordinator_name(id).unwrap_or("-").to_string(),
                s.total.to_string(),
                s.contacted.to_string(),
                s.remaining.to_string(),
                fmt_percent(s.percent),
            ]
        })
        .collect();
    print_table(
        &["COORDINATOR", "NAME", "TOTAL", "CONTACTED", "REMAINING", "PERCENT"],
        rows,
    );
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
    let pending = svc.zen_roster(unit, coordinator)?;

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
        println!("{coordinator} has no uncontacted subjects");
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

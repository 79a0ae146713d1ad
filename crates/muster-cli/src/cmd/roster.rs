use crate::output::{print_json, print_table};
use crate::roster::Roster;
use clap::Subcommand;
use muster_core::types::{CoordinatorId, SubjectId, UnitId};
use std::path::Path;

#[derive(Subcommand)]
pub enum RosterSubcommand {
    /// Add (or rename) a coordinator
    AddCoordinator {
        id: CoordinatorId,
        /// Display name for tables
        #[arg(long)]
        name: Option<String>,
        /// Add as a member who does not hold the coordinator role
        #[arg(long)]
        ineligible: bool,
    },
    /// Remove a coordinator entirely (models leaving the unit)
    RemoveCoordinator { id: CoordinatorId },
    /// Flip a coordinator's role eligibility (false models a lost role)
    SetEligible {
        id: CoordinatorId,
        #[arg(action = clap::ArgAction::Set)]
        eligible: bool,
    },
    /// Add (or rename) a subject
    AddSubject {
        id: SubjectId,
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove a subject
    RemoveSubject { id: SubjectId },
    /// Show the full roster
    Show,
}

pub fn run(root: &Path, unit: UnitId, subcmd: RosterSubcommand, json: bool) -> anyhow::Result<()> {
    let mut roster = Roster::load(root, unit)?;

    match subcmd {
        RosterSubcommand::AddCoordinator {
            id,
            name,
            ineligible,
        } => {
            let added = roster.upsert_coordinator(id, name, !ineligible);
            roster.save(root, unit)?;
            println!("{} coordinator {id}", if added { "added" } else { "updated" });
        }
        RosterSubcommand::RemoveCoordinator { id } => {
            if roster.remove_coordinator(id) {
                roster.save(root, unit)?;
                println!("removed coordinator {id}");
            } else {
                println!("coordinator {id} was not on the roster");
            }
        }
        RosterSubcommand::SetEligible { id, eligible } => {
            anyhow::ensure!(
                roster.set_eligible(id, eligible),
                "coordinator {id} is not on the roster"
            );
            roster.save(root, unit)?;
            println!("coordinator {id} eligible = {eligible}");
        }
        RosterSubcommand::AddSubject { id, name } => {
            let added = roster.upsert_subject(id, name);
            roster.save(root, unit)?;
            println!("{} subject {id}", if added { "added" } else { "updated" });
        }
        RosterSubcommand::RemoveSubject { id } => {
            if roster.remove_subject(id) {
                roster.save(root, unit)?;
                println!("removed subject {id}");
            } else {
                println!("subject {id} was not on the roster");
            }
        }
        RosterSubcommand::Show => return show(&roster, json),
    }
    Ok(())
}

fn show(roster: &Roster, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(roster);
    }

    let rows = roster
        .coordinators
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.name.as_deref().unwrap_or("-").to_string(),
                if e.eligible { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(&["COORDINATOR", "NAME", "ELIGIBLE"], rows);

    println!();
    let rows = roster
        .subjects
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.name.as_deref().unwrap_or("-").to_string(),
            ]
        })
        .collect();
    print_table(&["SUBJECT", "NAME"], rows);
    Ok(())
}

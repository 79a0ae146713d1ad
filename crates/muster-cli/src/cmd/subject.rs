use crate::output::{print_json, print_table};
use crate::roster::Roster;
use anyhow::Context;
use muster_core::service::ArrivalOutcome;
use muster_core::types::{CoordinatorId, SubjectId, UnitId};
use std::path::Path;

pub fn arrived(root: &Path, unit: UnitId, subject: SubjectId, json: bool) -> anyhow::Result<()> {
    let roster = Roster::load(root, unit)?;
    let svc = super::service(root);
    let outcome = svc
        .subject_arrived(unit, subject, &roster)
        .with_context(|| format!("failed to assign subject {subject}"))?;

    if json {
        return print_json(&outcome);
    }

    match outcome {
        ArrivalOutcome::Assigned { coordinators } => {
            let list: Vec<String> = coordinators.iter().map(ToString::to_string).collect();
            println!("assigned {} to coordinators: {}", subject, list.join(", "));
        }
        ArrivalOutcome::NoEligibleCoordinators => {
            println!("no eligible coordinators — {subject} left unassigned, retry later");
        }
    }
    Ok(())
}

pub fn reassign(
    root: &Path,
    unit: UnitId,
    subject: SubjectId,
    from: CoordinatorId,
    to: CoordinatorId,
) -> anyhow::Result<()> {
    let roster = Roster::load(root, unit)?;
    let svc = super::service(root);
    svc.reassign_subject(unit, subject, from, to, &roster)
        .with_context(|| format!("failed to reassign {subject} from {from} to {to}"))?;
    println!("moved {subject} from {from} to {to}");
    Ok(())
}

pub fn whois(root: &Path, unit: UnitId, subject: SubjectId, json: bool) -> anyhow::Result<()> {
    let roster = Roster::load(root, unit)?;
    let svc = super::service(root);
    let holders = svc.who_is_assigned(unit, subject)?;

    if json {
        #[derive(serde::Serialize)]
        struct Holder {
            coordinator: CoordinatorId,
            contacted: bool,
        }
        let out: Vec<Holder> = holders
            .into_iter()
            .map(|(coordinator, contacted)| Holder {
                coordinator,
                contacted,
            })
            .collect();
        return print_json(&out);
    }

    if holders.is_empty() {
        println!("{subject} is not assigned to any coordinator");
        return Ok(());
    }
    let rows = holders
        .into_iter()
        .map(|(id, contacted)| {
            vec![
                id.to_string(),
                roster.coordinator_name(id).unwrap_or("-").to_string(),
                if contacted { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(&["COORDINATOR", "NAME", "CONTACTED"], rows);
    Ok(())
}

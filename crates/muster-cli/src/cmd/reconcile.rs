use crate::output::{print_json, print_table};
use crate::roster::Roster;
use anyhow::Context;
use muster_core::types::UnitId;
use std::path::Path;

pub fn check(root: &Path, unit: UnitId, json: bool) -> anyhow::Result<()> {
    let roster = Roster::load(root, unit)?;
    let svc = super::service(root);
    let invalid = svc.check(unit, &roster)?;

    if json {
        return print_json(&invalid);
    }

    if invalid.is_empty() {
        println!("all assigned coordinators are still eligible");
        return Ok(());
    }
    let rows = invalid
        .iter()
        .map(|entry| {
            vec![
                entry.id.to_string(),
                if entry.was_member {
                    "lost role".to_string()
                } else {
                    "left unit".to_string()
                },
                entry.subject_count.to_string(),
            ]
        })
        .collect();
    print_table(&["COORDINATOR", "REASON", "SUBJECTS"], rows);
    println!("run 'muster repair' to redistribute their subjects");
    Ok(())
}

pub fn repair(root: &Path, unit: UnitId, json: bool) -> anyhow::Result<()> {
    let roster = Roster::load(root, unit)?;
    let svc = super::service(root);
    let summary = svc
        .repair(unit, &roster)
        .context("reconciliation repair failed")?;

    if json {
        return print_json(&summary);
    }

    if summary.removed.is_empty() {
        println!("nothing to repair");
    } else {
        println!(
            "removed {} coordinator(s), redistributed {} subject(s)",
            summary.removed.len(),
            summary.reassigned_subjects
        );
    }
    Ok(())
}

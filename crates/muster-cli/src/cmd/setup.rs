use crate::output::print_table;
use crate::roster::Roster;
use anyhow::Context;
use muster_core::types::UnitId;
use std::path::Path;

pub fn run(root: &Path, unit: UnitId, json: bool) -> anyhow::Result<()> {
    let roster = Roster::load(root, unit)?;
    let svc = super::service(root);
    let summary = svc
        .setup(unit, &roster)
        .context("initial striping failed")?;

    if json {
        return crate::output::print_json(&summary);
    }

    println!(
        "striped {} subjects across {} coordinators (stripe count {})",
        summary.subjects, summary.coordinators, summary.stripe_count
    );
    let rows = svc
        .all_stats(unit)?
        .into_iter()
        .map(|(id, stats)| {
            vec![
                id.to_string(),
                roster.coordinator_name(id).unwrap_or("-").to_string(),
                stats.total.to_string(),
            ]
        })
        .collect();
    print_table(&["COORDINATOR", "NAME", "ASSIGNED"], rows);
    Ok(())
}

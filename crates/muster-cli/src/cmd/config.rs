use crate::output::print_json;
use clap::Subcommand;
use muster_core::types::UnitId;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the unit's configuration
    Show,
    /// Set the stripe count (how many coordinators each subject gets)
    SetStripes { count: u32 },
    /// Set the first-contact message template ({subject} is substituted)
    SetZenTemplate { template: String },
    /// Set the update-round reminder template ({subject} is substituted)
    SetWhipTemplate { template: String },
}

pub fn run(root: &Path, unit: UnitId, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    let svc = super::service(root);

    match subcmd {
        ConfigSubcommand::Show => {
            let config = svc.config(unit)?;
            if json {
                return print_json(&config);
            }
            println!("stripe_count:  {}", config.stripe_count);
            println!("zen_template:  {}", config.zen_template);
            println!("whip_template: {}", config.whip_template);
        }
        ConfigSubcommand::SetStripes { count } => {
            svc.set_stripe_count(unit, count)?;
            println!("stripe count set to {count}");
        }
        ConfigSubcommand::SetZenTemplate { template } => {
            svc.set_zen_template(unit, template)?;
            println!("zen template updated");
        }
        ConfigSubcommand::SetWhipTemplate { template } => {
            svc.set_whip_template(unit, template)?;
            println!("whip template updated");
        }
    }
    Ok(())
}

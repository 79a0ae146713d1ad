mod cmd;
mod output;
mod roster;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, roster::RosterSubcommand, update::UpdateSubcommand,
    zen::ZenSubcommand,
};
use muster_core::types::{CoordinatorId, SubjectId, UnitId};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "muster",
    about = "Outreach assignment engine — stripe subjects across coordinators and track contact progress",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from .muster/ or .git/)
    #[arg(long, global = true, env = "MUSTER_ROOT")]
    root: Option<PathBuf>,

    /// Organizational unit id
    #[arg(long, global = true, env = "MUSTER_UNIT", default_value = "0")]
    unit: UnitId,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize muster in the current workspace
    Init,

    /// Stripe the entire roster population across coordinators
    Setup,

    /// List assignment-table coordinators who are no longer eligible
    Check,

    /// Remove invalid coordinators and re-stripe their orphaned subjects
    Repair,

    /// Assign a newly-arrived subject to a random stripe of coordinators
    Arrived { subject: SubjectId },

    /// Move one subject from one coordinator to another
    Reassign {
        subject: SubjectId,
        #[arg(long)]
        from: CoordinatorId,
        #[arg(long)]
        to: CoordinatorId,
    },

    /// Show which coordinators hold a subject, with contact flags
    Whois { subject: SubjectId },

    /// First-contact round: mark, stats, roster
    Zen {
        #[command(subcommand)]
        subcommand: ZenSubcommand,
    },

    /// Campaign round: mark, status, reset
    Update {
        #[command(subcommand)]
        subcommand: UpdateSubcommand,
    },

    /// Maintain the membership roster backing assignment decisions
    Roster {
        #[command(subcommand)]
        subcommand: RosterSubcommand,
    },

    /// Unit configuration: stripe count and message templates
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let unit = cli.unit;

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Setup => cmd::setup::run(&root, unit, cli.json),
        Commands::Check => cmd::reconcile::check(&root, unit, cli.json),
        Commands::Repair => cmd::reconcile::repair(&root, unit, cli.json),
        Commands::Arrived { subject } => cmd::subject::arrived(&root, unit, subject, cli.json),
        Commands::Reassign { subject, from, to } => {
            cmd::subject::reassign(&root, unit, subject, from, to)
        }
        Commands::Whois { subject } => cmd::subject::whois(&root, unit, subject, cli.json),
        Commands::Zen { subcommand } => cmd::zen::run(&root, unit, subcommand, cli.json),
        Commands::Update { subcommand } => cmd::update::run(&root, unit, subcommand, cli.json),
        Commands::Roster { subcommand } => cmd::roster::run(&root, unit, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, unit, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, people::PeopleSubcommand, WeekArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pickup",
    about = "Weekly child pickup schedule: book, clear and remind",
    version,
    propagate_version = true
)]
struct Cli {
    /// Schedule root (default: auto-detect from .pickup/)
    #[arg(long, global = true, env = "PICKUP_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Admin password for this invocation
    #[arg(long, global = true, env = "PICKUP_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .pickup/ with a default config and an empty schedule
    Init,

    /// Show the slots of a week
    Week {
        #[command(flatten)]
        week: WeekArgs,
    },

    /// Book a person into a slot, replacing any existing booking
    Assign {
        /// Day index 0-5 or name (Sunday..Friday)
        day: String,
        /// Person name as it appears in the roster
        name: String,
        #[command(flatten)]
        week: WeekArgs,
    },

    /// Empty a slot (admin)
    Clear {
        day: String,
        #[command(flatten)]
        week: WeekArgs,
    },

    /// Clear every slot of a week (admin)
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
        #[command(flatten)]
        week: WeekArgs,
    },

    /// Manage the roster
    People {
        #[command(subcommand)]
        subcommand: PeopleSubcommand,
    },

    /// WhatsApp reminder links for the assigned slots of a week
    Remind {
        #[command(flatten)]
        week: WeekArgs,
    },

    /// Validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Interactive session reading commands from stdin
    Shell,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Shell => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let password = cli.password.as_deref().filter(|p| !p.is_empty());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Week { week } => cmd::week::run(&root, week, cli.json),
        Commands::Assign { day, name, week } => {
            cmd::slot::assign(&root, password, week, &day, &name, cli.json)
        }
        Commands::Clear { day, week } => cmd::slot::clear(&root, password, week, &day, cli.json),
        Commands::Reset { yes, week } => cmd::slot::reset(&root, password, week, yes, cli.json),
        Commands::People { subcommand } => cmd::people::run(&root, password, subcommand, cli.json),
        Commands::Remind { week } => cmd::remind::run(&root, week, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Shell => cmd::shell::run(&root, password, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

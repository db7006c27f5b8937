use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "solstreak", version, about = "Solstreak CLI")]
struct Cli {
    /// Owner to act on (defaults to profile.owner_id)
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Evaluate as of this RFC 3339 instant instead of the current time
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Weekly activity streaks
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Dragon feeding and status
    Dragon {
        #[command(subcommand)]
        action: commands::dragon::DragonAction,
    },
    /// Daily villager harvests
    Harvest {
        #[command(subcommand)]
        action: commands::harvest::HarvestAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SOLSTREAK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn with_context(
    owner: Option<String>,
    now: Option<String>,
    run: impl FnOnce(&commands::Context) -> CommandResult,
) -> CommandResult {
    let ctx = commands::Context::new(owner, now)?;
    run(&ctx)
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let (owner, now) = (cli.owner, cli.now);

    let result = match cli.command {
        Commands::Streak { action } => {
            with_context(owner, now, |ctx| commands::streak::run(ctx, action))
        }
        Commands::Dragon { action } => {
            with_context(owner, now, |ctx| commands::dragon::run(ctx, action))
        }
        Commands::Harvest { action } => {
            with_context(owner, now, |ctx| commands::harvest::run(ctx, action))
        }
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

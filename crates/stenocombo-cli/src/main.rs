use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "stenocombo", version, about = "Stroke combo counter")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Inspect the color milestone table
    Colors {
        #[command(subcommand)]
        action: commands::colors::ColorsAction,
    },
    /// High score management
    Highscore {
        #[command(subcommand)]
        action: commands::highscore::HighscoreAction,
    },
    /// Replay a stroke script on a virtual clock
    Simulate(commands::simulate::SimulateArgs),
    /// Count strokes read from stdin in real time
    Live,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("STENOCOMBO_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::Colors { action } => commands::colors::run(action),
        Commands::Highscore { action } => commands::highscore::run(action),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Live => commands::live::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

//! Team Balancer CLI
//!
//! `tb build` splits the available players of a roster into balanced teams.
//! `tb roles` shows how many players can cover each role.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use std::process::ExitCode;
#[cfg(feature = "cli")]
use tb_core::BalanceMode;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "tb")]
#[command(about = "Build role-balanced teams from a player roster", long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Role,
    Flat,
}

#[cfg(feature = "cli")]
impl From<Mode> for BalanceMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Role => BalanceMode::Role,
            Mode::Flat => BalanceMode::Flat,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Build teams from a roster and an availability list
    Build {
        /// Player roster (JSON array)
        #[arg(long)]
        roster: PathBuf,

        /// Availability list, one name per line
        #[arg(long)]
        available: PathBuf,

        /// Players per team (defaults to the number of roles)
        #[arg(long)]
        team_size: Option<usize>,

        /// Number of teams (defaults to available / team size)
        #[arg(long)]
        teams: Option<usize>,

        #[arg(long, value_enum)]
        mode: Option<Mode>,

        /// Config JSON file (falls back to TB_CONFIG_PATH)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Show eligible players per role
    Roles {
        /// Player roster (JSON array)
        #[arg(long)]
        roster: PathBuf,

        /// Config JSON file with the role set
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    // RUST_LOG wins over -v/-q
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[cfg(feature = "cli")]
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(tb_cli::exit_status(&err))
        }
    }
}

#[cfg(feature = "cli")]
fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Build { roster, available, team_size, teams, mode, config, json } => {
            let roster = tb_cli::load_roster(&roster)?;
            let lines = tb_cli::load_available(&available)?;
            let overrides = tb_cli::Overrides { team_size, num_teams: teams, mode: mode.map(Into::into) };
            let config = overrides.apply(tb_cli::load_config(config.as_deref())?);

            let report = tb_cli::build(&roster, &lines, config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", tb_cli::render_report(&report));
            }
        }

        Commands::Roles { roster, config } => {
            let roster = tb_cli::load_roster(&roster)?;
            let config = tb_cli::load_config(config.as_deref())?;
            let depth = tb_cli::role_depth(&roster, &config.roles);
            print!("{}", tb_cli::render_depth(&depth));
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("tb CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}

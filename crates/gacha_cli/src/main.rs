//! Gacha CLI
//!
//! Validate banner files, draw against a persisted ledger, inspect a
//! player's history and run Monte Carlo checks of banner odds.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "gacha")]
#[command(about = "Gacha banner tooling: validate, draw, simulate", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Validate a banner file (JSON or YAML)
    Validate {
        /// Banner file path
        #[arg(long)]
        banner: PathBuf,

        /// Item catalog (JSON array) to cross-check ids and rarities
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Draw for a player and record the pulls in the ledger
    Draw {
        #[arg(long)]
        banner: PathBuf,

        /// Player id the pity state is kept under
        #[arg(long)]
        player: String,

        #[arg(long, default_value_t = 1)]
        count: u32,

        /// Fixed seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Ledger directory
        #[arg(long, env = "GACHA_LEDGER_DIR", default_value = "ledger")]
        ledger: PathBuf,
    },

    /// Show a player's pull statistics on a banner
    Stats {
        #[arg(long)]
        banner: PathBuf,

        #[arg(long)]
        player: String,

        #[arg(long, env = "GACHA_LEDGER_DIR", default_value = "ledger")]
        ledger: PathBuf,
    },

    /// Monte Carlo run compared against the analytic 5★ rate
    Simulate {
        #[arg(long)]
        banner: PathBuf,

        #[arg(long, default_value_t = 1000)]
        sessions: u32,

        /// Pulls per session
        #[arg(long, default_value_t = 1000)]
        pulls: u32,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Also print the report as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Print the banner JSON Schema
    Schema,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    log::debug!("gacha_core {}", gacha_core::VERSION);

    match cli.command {
        Commands::Validate { banner, catalog } => {
            let violations = gacha_cli::check_banner(&banner, catalog.as_deref())?;
            if violations.is_empty() {
                println!("✅ {} is valid", banner.display());
            } else {
                println!("❌ {} has {} violation(s):", banner.display(), violations.len());
                for violation in &violations {
                    println!("   {} [{}]: {}", violation.field(), violation.constraint(), violation);
                }
                anyhow::bail!("Banner validation failed");
            }
        }

        Commands::Draw { banner, player, count, seed, catalog, ledger } => {
            let (config, catalog) = gacha_cli::load_validated(&banner, catalog.as_deref())?;
            let (outcome, seed) = gacha_cli::draw_into_ledger(
                &config,
                catalog.as_ref(),
                &ledger,
                &player,
                count,
                seed,
            )?;

            println!("🎲 {} × {} on '{}' (seed {})", player, count, config.name(), seed);
            for result in outcome.display_order(catalog.as_ref()) {
                let marker = if result.is_rate_up { " ⬆" } else { "" };
                println!("   {} {}{}", result.rarity, result.item_id, marker);
            }
            println!(
                "   Pity: {} since 5★, {} since 4★",
                outcome.state.pulls_since_5star, outcome.state.pulls_since_4star
            );
        }

        Commands::Stats { banner, player, ledger } => {
            let config = gacha_cli::load_banner(&banner)?;
            let banner_id = config.resolved_id();
            match gacha_cli::session_stats(&ledger, &player, &banner_id)? {
                Some(stats) => {
                    println!("📊 {} on '{}'", player, config.name);
                    print!("{}", stats.summary());
                }
                None => println!("{} has no pulls on '{}'", player, config.name),
            }
        }

        Commands::Simulate { banner, sessions, pulls, seed, json } => {
            let (config, _) = gacha_cli::load_validated(&banner, None)?;
            let sim = gacha_core::SimulationConfig::cohort(sessions, pulls, seed);
            let report = gacha_core::simulate(&config, &sim)?;

            print!("{}", report.summary());
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }

        Commands::Schema => {
            println!("{}", gacha_core::banner_schema_json());
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("gacha CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}

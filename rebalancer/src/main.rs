//! CLI entry point for the folio rebalancer.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use folio::Mode;

use folio_rebalancer::commands::{self, CalcOptions};
use folio_rebalancer::config::Config;
use folio_rebalancer::error::Error;

#[derive(Parser)]
#[command(name = "rebalancer")]
#[command(about = "Portfolio rebalancing calculator")]
#[command(version)]
struct Cli {
    /// Path to rebalancer.toml (defaults apply if missing)
    #[arg(long, default_value = "rebalancer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute a rebalancing plan
    Calc {
        /// Portfolio file (.json, .csv, text) or @saved-name
        portfolio: String,

        /// standard, add-only, sell-only, contribution or withdrawal
        #[arg(long)]
        mode: Option<Mode>,

        /// Cash to add or withdraw
        #[arg(long, default_value_t = 0.0)]
        amount: f64,

        /// Include the asset-class rollup
        #[arg(long)]
        group: bool,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Show health score and drift
    Health {
        portfolio: String,
    },

    /// Compare against a model portfolio (closest model if omitted)
    Compare {
        portfolio: String,

        #[arg(long)]
        model: Option<String>,
    },

    /// List built-in model portfolios
    Models,

    /// Save a portfolio under a name
    Save {
        name: String,
        portfolio: String,

        /// Overwrite without asking
        #[arg(long)]
        force: bool,
    },

    /// List saved portfolios
    List,

    /// Show a saved portfolio
    Show {
        name: String,
    },

    /// Delete a saved portfolio
    Delete {
        name: String,

        /// Delete without asking
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Calc {
            portfolio,
            mode,
            amount,
            group,
            json,
        } => commands::calc(
            &config,
            &CalcOptions {
                portfolio,
                mode,
                amount,
                group,
                json,
            },
        ),
        Command::Health { portfolio } => commands::health(&config, &portfolio),
        Command::Compare { portfolio, model } => {
            commands::compare(&config, &portfolio, model.as_deref())
        }
        Command::Models => Ok(commands::models()),
        Command::Save {
            name,
            portfolio,
            force,
        } => commands::save(&config, &name, &portfolio, force),
        Command::List => Ok(commands::list(&config)),
        Command::Show { name } => commands::show(&config, &name),
        Command::Delete { name, force } => commands::delete(&config, &name, force),
    };

    match result {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) if e.is_validation() => {
            eprintln!("Invalid input: {e}");
            process::exit(2);
        }
        Err(Error::Aborted(msg)) => {
            eprintln!("Aborted: {msg}");
            process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

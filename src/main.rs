//! vue-style-migrate: migrate deep selectors and slash division in Vue components.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use vue_style_migrate::{config, Migrator};

#[derive(Parser)]
#[command(name = "vue-style-migrate")]
#[command(about = "Migrate Vue component styles to :deep and math.div", long_about = None)]
struct Args {
    /// Project directory to migrate
    #[arg(value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Only rewrite selectors, do not run sass-migrator
    #[arg(long)]
    skip_division: bool,

    /// Print a JSON summary of the run to stdout
    #[arg(long)]
    report: bool,

    /// Log debug output
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("VUE_STYLE_MIGRATE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("failed to initialize logging: {e}");
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.quiet, args.verbose);

    let mut cfg = config::Config::load();
    cfg.apply_env();

    // Override config with command line args
    if args.skip_division {
        cfg.run_division = false;
    }

    let mut migrator = Migrator::new(&args.dir, cfg);
    match migrator.migrate() {
        Ok(report) => {
            if args.report {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

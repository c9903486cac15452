// src/main.rs

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};

mod agol;
mod cli;
mod datasets;
mod fields;
mod notify;
mod salesforce;
mod settings;
mod skid;
mod spatial;

use agol::ArcGisClient;
use cli::{Cli, Commands};
use notify::RunNotifier;
use salesforce::SalesforceClient;
use settings::{environment, io, SKID_NAME, SKID_VERSION};
use skid::{Skid, SkidError};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Held until exit; dropping it removes the log directory.
    let run_log = match skid::logging::init() {
        Ok(run_log) => run_log,
        Err(e) => {
            eprintln!("Could not create the run log: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("{} v{}", SKID_NAME, SKID_VERSION);

    let result = match cli.command {
        None => process(run_log.path()),
        Some(Commands::Publish) => cli::publish::run(),
        Some(Commands::ListFields { dataset }) => {
            cli::list_fields::run(dataset);
            Ok(())
        }
        Some(Commands::CheckEnvironment) => {
            cli::check_environment::run();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", skid::error_chain(&e));
            ExitCode::FAILURE
        }
    }
}

/// Scheduled entry point. Always the routine update; publishing is its own
/// subcommand.
fn process(log_path: &Path) -> Result<(), SkidError> {
    let environment = environment::detect();
    let secrets = io::load_secrets()?;

    let extractor = SalesforceClient::from_secrets(&secrets)?;
    let loader = ArcGisClient::from_secrets(&secrets)?;
    let notifier = RunNotifier::for_environment(&environment, &secrets)?;

    let mut skid = Skid::new(extractor, loader, notifier, &secrets).with_log_file(log_path.to_path_buf());
    let summary = skid.update()?;
    info!(
        "Loaded {} rows across {} datasets",
        summary.counts.iter().map(|c| c.rows).sum::<usize>(),
        summary.counts.len()
    );
    Ok(())
}

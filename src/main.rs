//! Service Packager - HTTP service for per-project packaging configuration.

use std::process;

use clap::Parser;
use service_packager::cli::{Cli, Commands};
use service_packager::config::{ServiceConfig, resolve_config};
use service_packager::server::{AppState, start_server};
use service_packager::settings::SettingsRepository;
use service_packager::{Error, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Log to stderr so `show` output on stdout stays machine-readable.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,service_packager=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli.overrides())?;
    config.install_result_codes()?;
    tracing::debug!(
        settings_file = %config.settings_file_path().display(),
        source = %config.settings_file_path.source,
        "Resolved settings file"
    );

    // A settings file that exists but cannot be parsed stops startup here
    let repository = SettingsRepository::load(config.settings_file_path())?;

    match cli.command {
        None | Some(Commands::Serve { .. }) => serve(repository, &config),
        Some(Commands::Show { project }) => show(&repository, project.as_deref()),
    }
}

fn serve(repository: SettingsRepository, config: &ServiceConfig) -> Result<()> {
    tracing::info!(
        host = %config.host(),
        host_source = %config.host.source,
        port = config.port(),
        port_source = %config.port.source,
        "Starting service packager"
    );

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Other(format!("Failed to create runtime: {}", e)))?
        .block_on(start_server(
            AppState::new(repository),
            config.host(),
            config.port(),
        ))
}

fn show(repository: &SettingsRepository, project: Option<&str>) -> Result<()> {
    let json = match project {
        Some(project) => {
            let params = repository
                .packaging_params(project)
                .ok_or_else(|| Error::NotFound(format!("project '{}'", project)))?;
            serde_json::to_string_pretty(params)?
        }
        None => serde_json::to_string_pretty(repository.settings())?,
    };
    println!("{}", json);
    Ok(())
}

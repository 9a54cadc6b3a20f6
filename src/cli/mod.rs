//! CLI argument definitions for the packaging service.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ConfigOverrides;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("JSP_GIT_COMMIT"),
    " ",
    env!("JSP_BUILD_TIMESTAMP"),
    ")"
);

/// Service Packager - stores per-project packaging configuration.
///
/// Run without a command to start the HTTP server.
#[derive(Parser, Debug)]
#[command(name = "service-packager")]
#[command(author, version, long_version = LONG_VERSION, about = "HTTP service that stores per-project packaging configuration", long_about = None)]
pub struct Cli {
    /// Config file with a [jsp] table. Defaults to ./jsp.toml when present.
    #[arg(short, long, global = true, env = "JSP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Settings file to load and save (overrides JSP_SETTINGS_FILE_PATH)
    #[arg(short = 'f', long = "settings-file", global = true)]
    pub settings_file: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Port to listen on (overrides JSP_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host address to bind to (overrides JSP_HOST)
        #[arg(long)]
        host: Option<String>,
    },

    /// Print stored settings as JSON
    Show {
        /// Only print this project's packaging params
        project: Option<String>,
    },
}

impl Cli {
    /// Collect the flags that take part in config resolution.
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            config_path: self.config.clone(),
            settings_file_path: self.settings_file.clone(),
            ..ConfigOverrides::default()
        };
        if let Some(Commands::Serve { port, host }) = &self.command {
            overrides.port = *port;
            overrides.host = host.clone();
        }
        overrides
    }
}

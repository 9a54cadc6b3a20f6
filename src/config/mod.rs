//! Configuration for the packaging service.
//!
//! Configuration comes from CLI flags, `JSP_*` environment variables and an
//! optional TOML file with a `[jsp]` table (see [`schema`]). The
//! [`resolver`] module merges them and records where each value came from.
//!
//! ## Precedence
//!
//! CLI flag > environment variable > config file > defaults

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, DEFAULT_CONFIG_FILE, DEFAULT_HOST, DEFAULT_PORT, HOST_ENV, PORT_ENV,
    Resolved, SETTINGS_FILE_PATH_ENV, ServiceConfig, ValueSource, resolve_config,
    resolve_config_with_env,
};
pub use schema::{ConfigFile, JspConfig};

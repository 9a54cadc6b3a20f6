//! Precedence resolution for service configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Environment variables (`JSP_SETTINGS_FILE_PATH`, `JSP_HOST`, `JSP_PORT`)
//! 3. Config file (`--config`, or `jsp.toml` in the working directory)
//! 4. Built-in defaults
//!
//! Result codes are only read from the config file.

use std::path::{Path, PathBuf};

use crate::config::ConfigFile;
use crate::envelope::{ResultCodes, set_result_codes};
use crate::settings::DEFAULT_SETTINGS_FILE;
use crate::{Error, Result};

/// Environment variable overriding the settings file path.
pub const SETTINGS_FILE_PATH_ENV: &str = "JSP_SETTINGS_FILE_PATH";

/// Environment variable overriding the bind host.
pub const HOST_ENV: &str = "JSP_HOST";

/// Environment variable overriding the bind port.
pub const PORT_ENV: &str = "JSP_PORT";

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "jsp.toml";

pub const DEFAULT_HOST: &str = "127.0.0.1";

pub const DEFAULT_PORT: u16 = 8080;

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from environment variable
    EnvVar(String),
    /// Value from a config file
    ConfigFile(PathBuf),
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile(path) => write!(f, "file:{}", path.display()),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved service configuration with source tracking.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Settings document location
    pub settings_file_path: Resolved<PathBuf>,
    /// Bind host
    pub host: Resolved<String>,
    /// Bind port
    pub port: Resolved<u16>,
    /// Process-wide envelope codes
    pub result_codes: Resolved<ResultCodes>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            settings_file_path: Resolved::new(
                PathBuf::from(DEFAULT_SETTINGS_FILE),
                ValueSource::Default,
            ),
            host: Resolved::new(DEFAULT_HOST.to_string(), ValueSource::Default),
            port: Resolved::new(DEFAULT_PORT, ValueSource::Default),
            result_codes: Resolved::new(ResultCodes::DEFAULT, ValueSource::Default),
        }
    }
}

impl ServiceConfig {
    pub fn settings_file_path(&self) -> &Path {
        &self.settings_file_path.value
    }

    pub fn host(&self) -> &str {
        &self.host.value
    }

    pub fn port(&self) -> u16 {
        self.port.value
    }

    /// Register the configured result codes for every envelope in the process.
    pub fn install_result_codes(&self) -> Result<()> {
        set_result_codes(self.result_codes.value)
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit config file; it must exist
    pub config_path: Option<PathBuf>,
    /// Settings file override from CLI flag
    pub settings_file_path: Option<PathBuf>,
    /// Host override from CLI flag
    pub host: Option<String>,
    /// Port override from CLI flag
    pub port: Option<u16>,
}

impl ConfigOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_settings_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file_path = Some(path.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

/// Resolve configuration from CLI overrides, the process environment and
/// the config file.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ServiceConfig> {
    resolve_config_with_env(overrides, |name| std::env::var(name).ok())
}

/// Resolve configuration with an explicit environment lookup.
pub fn resolve_config_with_env(
    overrides: &ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ServiceConfig> {
    let mut result = ServiceConfig::default();

    let (file, file_path) = match &overrides.config_path {
        Some(path) => (ConfigFile::load(path)?, Some(path.clone())),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if path.exists() {
                (ConfigFile::load(&path)?, Some(path))
            } else {
                (ConfigFile::default(), None)
            }
        }
    };
    if let Some(path) = &file_path {
        tracing::debug!(path = %path.display(), "Using config file");
    }
    let from_file = || ValueSource::ConfigFile(file_path.clone().unwrap_or_default());
    let from_env = |name: &str| env(name).filter(|v| !v.is_empty());
    let jsp = &file.jsp;

    // Resolve settings_file_path
    if let Some(path) = &overrides.settings_file_path {
        result.settings_file_path = Resolved::new(path.clone(), ValueSource::CliFlag);
    } else if let Some(path) = from_env(SETTINGS_FILE_PATH_ENV) {
        result.settings_file_path = Resolved::new(
            PathBuf::from(path),
            ValueSource::EnvVar(SETTINGS_FILE_PATH_ENV.to_string()),
        );
    } else if let Some(path) = &jsp.settings_file_path {
        result.settings_file_path = Resolved::new(path.clone(), from_file());
    }

    // Resolve host
    if let Some(host) = &overrides.host {
        result.host = Resolved::new(host.clone(), ValueSource::CliFlag);
    } else if let Some(host) = from_env(HOST_ENV) {
        result.host = Resolved::new(host, ValueSource::EnvVar(HOST_ENV.to_string()));
    } else if let Some(host) = &jsp.host {
        result.host = Resolved::new(host.clone(), from_file());
    }

    // Resolve port
    if let Some(port) = overrides.port {
        result.port = Resolved::new(port, ValueSource::CliFlag);
    } else if let Some(port) = from_env(PORT_ENV) {
        let port = port.parse::<u16>().map_err(|_| {
            Error::InvalidInput(format!("{} must be a port number, got '{}'", PORT_ENV, port))
        })?;
        result.port = Resolved::new(port, ValueSource::EnvVar(PORT_ENV.to_string()));
    } else if let Some(port) = jsp.port {
        result.port = Resolved::new(port, from_file());
    }

    // Resolve result codes; either key alone still overrides its half
    if jsp.success_code.is_some() || jsp.fail_code.is_some() {
        let codes = ResultCodes {
            success: jsp.success_code.unwrap_or(ResultCodes::DEFAULT.success),
            fail: jsp.fail_code.unwrap_or(ResultCodes::DEFAULT.fail),
        };
        codes.validate()?;
        result.result_codes = Resolved::new(codes, from_file());
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("jsp.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = resolve_config_with_env(&ConfigOverrides::new(), env_of(&[])).unwrap();

        assert_eq!(
            config.settings_file_path(),
            Path::new("java-service-packager.settings.json")
        );
        assert_eq!(config.settings_file_path.source, ValueSource::Default);
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), 8080);
        assert_eq!(config.result_codes.value, ResultCodes::DEFAULT);
        assert_eq!(config.result_codes.source, ValueSource::Default);
    }

    #[test]
    fn test_config_file_values() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[jsp]\nsettings-file-path = \"file.json\"\nhost = \"0.0.0.0\"\nport = 9000\nfail-code = 2\n",
        );

        let overrides = ConfigOverrides::new().with_config_path(&path);
        let config = resolve_config_with_env(&overrides, env_of(&[])).unwrap();

        assert_eq!(config.settings_file_path(), Path::new("file.json"));
        assert_eq!(
            config.settings_file_path.source,
            ValueSource::ConfigFile(path.clone())
        );
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.port(), 9000);
        assert_eq!(
            config.result_codes.value,
            ResultCodes {
                success: 0,
                fail: 2
            }
        );
        assert_eq!(config.result_codes.source, ValueSource::ConfigFile(path));
    }

    #[test]
    fn test_env_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[jsp]\nsettings-file-path = \"file.json\"\nport = 9000\n");

        let overrides = ConfigOverrides::new().with_config_path(&path);
        let env = env_of(&[(SETTINGS_FILE_PATH_ENV, "env.json"), (PORT_ENV, "7000")]);
        let config = resolve_config_with_env(&overrides, env).unwrap();

        assert_eq!(config.settings_file_path(), Path::new("env.json"));
        assert_eq!(
            config.settings_file_path.source,
            ValueSource::EnvVar(SETTINGS_FILE_PATH_ENV.to_string())
        );
        assert_eq!(config.port(), 7000);
        assert_eq!(config.host.source, ValueSource::Default);
    }

    #[test]
    fn test_cli_overrides_everything() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[jsp]\nhost = \"10.0.0.1\"\nport = 9000\n");

        let overrides = ConfigOverrides::new()
            .with_config_path(&path)
            .with_settings_file_path("cli.json")
            .with_host("::1")
            .with_port(6000);
        let env = env_of(&[
            (SETTINGS_FILE_PATH_ENV, "env.json"),
            (HOST_ENV, "192.168.0.1"),
            (PORT_ENV, "7000"),
        ]);
        let config = resolve_config_with_env(&overrides, env).unwrap();

        assert_eq!(config.settings_file_path(), Path::new("cli.json"));
        assert_eq!(config.settings_file_path.source, ValueSource::CliFlag);
        assert_eq!(config.host(), "::1");
        assert_eq!(config.host.source, ValueSource::CliFlag);
        assert_eq!(config.port(), 6000);
        assert_eq!(config.port.source, ValueSource::CliFlag);
    }

    #[test]
    fn test_empty_env_value_ignored() {
        let config =
            resolve_config_with_env(&ConfigOverrides::new(), env_of(&[(HOST_ENV, "")])).unwrap();
        assert_eq!(config.host.source, ValueSource::Default);
    }

    #[test]
    fn test_invalid_env_port() {
        let result =
            resolve_config_with_env(&ConfigOverrides::new(), env_of(&[(PORT_ENV, "http")]));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let dir = TempDir::new().unwrap();
        let overrides = ConfigOverrides::new().with_config_path(dir.path().join("nope.toml"));
        assert!(matches!(
            resolve_config_with_env(&overrides, env_of(&[])),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_success_code_colliding_with_default_fail() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[jsp]\nsuccess-code = -1\n");

        let overrides = ConfigOverrides::new().with_config_path(&path);
        assert!(matches!(
            resolve_config_with_env(&overrides, env_of(&[])),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_value_source_display() {
        assert_eq!(ValueSource::CliFlag.to_string(), "cli");
        assert_eq!(
            ValueSource::EnvVar(PORT_ENV.to_string()).to_string(),
            "env:JSP_PORT"
        );
        assert_eq!(
            ValueSource::ConfigFile(PathBuf::from("jsp.toml")).to_string(),
            "file:jsp.toml"
        );
        assert_eq!(ValueSource::Default.to_string(), "default");
    }
}

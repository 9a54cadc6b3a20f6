//! TOML schema for the optional service config file.
//!
//! ```toml
//! [jsp]
//! settings-file-path = "java-service-packager.settings.json"
//! host = "127.0.0.1"
//! port = 8080
//! success-code = 0
//! fail-code = -1
//! ```
//!
//! Every key is optional; unset keys fall through to lower-precedence
//! sources. Unknown keys are rejected so typos surface at startup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Values under the `[jsp]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct JspConfig {
    /// Path of the settings document
    pub settings_file_path: Option<PathBuf>,

    /// Address to bind the HTTP server to
    pub host: Option<String>,

    /// Port to bind the HTTP server to
    pub port: Option<u16>,

    /// Result code that marks an envelope as successful
    pub success_code: Option<i32>,

    /// Result code used for failures without an explicit code
    pub fail_code: Option<i32>,
}

impl JspConfig {
    /// Validate values that can be checked without the other sources.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let (Some(success), Some(fail)) = (self.success_code, self.fail_code) {
            if success == fail {
                return Err(format!(
                    "success-code and fail-code must differ, both are {}",
                    success
                ));
            }
        }
        if let Some(host) = &self.host {
            if host.trim().is_empty() {
                return Err("host must not be empty".to_string());
            }
        }
        Ok(())
    }
}

/// A parsed config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub jsp: JspConfig,
}

impl ConfigFile {
    /// Parse config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ConfigFile = toml::from_str(content)?;
        config.jsp.validate().map_err(crate::Error::InvalidInput)?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

//! File-backed settings repository.
//!
//! The repository owns the in-memory `Settings` document and the path it is
//! persisted to. The document is read once by [`SettingsRepository::load`]
//! and every [`SettingsRepository::save`] rewrites the whole file.
//!
//! The repository itself does no locking. Callers that share it between
//! requests wrap it in a mutex and use
//! [`SettingsRepository::save_project_packaging_params`] so the in-memory
//! update and the file write happen under one guard.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{PackagingParams, ProjectSettings, Settings};
use crate::{Error, Result};

/// Default settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "java-service-packager.settings.json";

/// Owner of the settings document and its backing file.
#[derive(Debug)]
pub struct SettingsRepository {
    path: PathBuf,
    settings: Settings,
}

impl SettingsRepository {
    /// Load settings from `path`.
    ///
    /// A missing file yields empty settings. A file that exists but cannot
    /// be read or parsed is an error; callers at startup should treat it as
    /// fatal rather than continue with partial state.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let settings = if path.exists() {
            let json = fs::read_to_string(&path)?;
            let settings: Settings = serde_json::from_str(&json)?;
            tracing::info!(
                path = %path.display(),
                projects = settings.projects.len(),
                "Settings loaded from file"
            );
            settings
        } else {
            tracing::info!(
                path = %path.display(),
                "Settings file not found. Using default settings"
            );
            Settings::new()
        };

        Ok(Self { path, settings })
    }

    /// Create a repository around an existing document without touching disk.
    pub fn with_settings(path: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            path: path.into(),
            settings,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current in-memory document.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Serialize the whole document and overwrite the backing file.
    ///
    /// The write is not atomic: a crash mid-write can leave a truncated file.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.path, json)?;
        tracing::info!(path = %self.path.display(), "Settings saved to file");
        Ok(())
    }

    /// Replace the packaging params of `project`, creating the entry if needed.
    ///
    /// Only the in-memory document changes; call [`save`](Self::save) to persist.
    pub fn upsert_project_packaging_params(
        &mut self,
        project: &str,
        packaging_params: PackagingParams,
    ) -> Result<()> {
        if project.is_empty() {
            return Err(Error::InvalidInput(
                "project name must not be empty".to_string(),
            ));
        }

        match self.settings.find_mut(project) {
            Some(existing) => {
                tracing::debug!(project, "Replacing packaging params");
                existing.packaging_params = packaging_params;
            }
            None => {
                tracing::debug!(project, "Adding project settings");
                self.settings
                    .projects
                    .push(ProjectSettings::new(project, packaging_params));
            }
        }

        Ok(())
    }

    /// Upsert the packaging params of `project` and persist the document.
    ///
    /// If the write fails the in-memory update is kept, matching what a
    /// later successful save would write.
    pub fn save_project_packaging_params(
        &mut self,
        project: &str,
        packaging_params: PackagingParams,
    ) -> Result<()> {
        self.upsert_project_packaging_params(project, packaging_params)?;
        self.save()
    }

    /// Packaging params stored for `project`, if any.
    pub fn packaging_params(&self, project: &str) -> Option<&PackagingParams> {
        self.settings.find(project).map(|s| &s.packaging_params)
    }
}

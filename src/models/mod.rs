//! Data models for the persisted settings document.
//!
//! This module defines the structures written to the settings file:
//! - `Settings` - The root document holding every known project
//! - `ProjectSettings` - One project's entry, keyed by project name
//! - `PackagingParams` - Client-defined packaging configuration, stored verbatim

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Client-defined packaging configuration.
///
/// The schema belongs to the caller, so the object is kept exactly as
/// received and written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackagingParams(Map<String, Value>);

impl PackagingParams {
    /// Create empty packaging params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the params, returning the underlying JSON object.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for PackagingParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<PackagingParams> for Value {
    fn from(params: PackagingParams) -> Self {
        Value::Object(params.0)
    }
}

/// One project's stored configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    /// Project name, the dedup key within `Settings::projects`
    pub project: String,

    /// Packaging configuration, replaced wholesale on every save
    #[serde(default)]
    pub packaging_params: PackagingParams,
}

impl ProjectSettings {
    /// Create a new entry for a project.
    pub fn new(project: impl Into<String>, packaging_params: PackagingParams) -> Self {
        Self {
            project: project.into(),
            packaging_params,
        }
    }
}

/// Root of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Known projects in insertion order; at most one entry per project name
    #[serde(default)]
    pub projects: Vec<ProjectSettings>,
}

impl Settings {
    /// Create an empty settings document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the entry for a project by exact name.
    pub fn find(&self, project: &str) -> Option<&ProjectSettings> {
        self.projects.iter().find(|s| s.project == project)
    }

    /// Find the entry for a project by exact name, mutably.
    pub fn find_mut(&mut self, project: &str) -> Option<&mut ProjectSettings> {
        self.projects.iter_mut().find(|s| s.project == project)
    }
}

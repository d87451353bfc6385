//! Workspace configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_core::errors::{codes, ErrorInfo, StrataError};

/// YAML/JSON-configurable settings for a [`crate::Workspace`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Master seed for the workspace RNG.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Resource caps.
    #[serde(default)]
    pub limits: Limits,
    /// Default names for derived attributes and generated structures.
    #[serde(default)]
    pub naming: Naming,
}

/// Master seed configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Seed handed to the workspace `RngHandle`.
    #[serde(default)]
    pub master_seed: u64,
}

/// Resource caps enforced by the workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Largest nodeset the workspace will create; unlimited when absent.
    #[serde(default)]
    pub max_nodes: Option<usize>,
}

/// Default names used by algorithms and generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Naming {
    /// Attribute written by connected-component labelling.
    #[serde(default = "default_component_attribute")]
    pub component_attribute: String,
    /// Prefix for hyperedges created by the two-mode generator.
    #[serde(default = "default_hyperedge_prefix")]
    pub hyperedge_prefix: String,
}

fn default_component_attribute() -> String {
    "component".to_string()
}

fn default_hyperedge_prefix() -> String {
    "h".to_string()
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            component_attribute: default_component_attribute(),
            hyperedge_prefix: default_hyperedge_prefix(),
        }
    }
}

impl WorkspaceConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, StrataError> {
        serde_yaml::from_str(contents).map_err(|err| parse_error(err.to_string()))
    }

    /// Parses a JSON document.
    pub fn from_json_str(contents: &str) -> Result<Self, StrataError> {
        serde_json::from_str(contents).map_err(|err| parse_error(err.to_string()))
    }

    /// Loads a configuration file; `.json` files are read as JSON, anything else as YAML.
    pub fn from_path(path: &Path) -> Result<Self, StrataError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            StrataError::Config(
                ErrorInfo::new(codes::CONFIG_READ, err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        };
        parsed.map_err(|err| err.with_context("path", path.display()))
    }
}

fn parse_error(message: String) -> StrataError {
    StrataError::Config(ErrorInfo::new(codes::CONFIG_PARSE, message))
}

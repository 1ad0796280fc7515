use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Settings {
    /// Maximum number of suite runs, including the first one
    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default)]
    pub engine: EngineSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct EngineSettings {
    /// Node executable that hosts the Cypress module API
    #[serde(default = "default_node_binary")]
    pub node_binary: PathBuf,

    /// Working directory used when no --project is given
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            node_binary: default_node_binary(),
            project_dir: default_project_dir(),
        }
    }
}

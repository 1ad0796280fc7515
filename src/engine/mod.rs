mod cypress;

pub use cypress::CypressEngine;

use crate::error::EngineError;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Options for a single `cypress.run()` invocation.
///
/// Field names follow the Cypress module API; unset options are left out of
/// the serialized object so Cypress applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_options: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(skip_serializing_if = "Map::is_empty")]
    pub env: Map<String, Value>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<PathBuf>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub parallel: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ci_build_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit: Option<bool>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub headed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev: Option<bool>,
}

impl RunConfig {
    /// Derive the config for attempt `num_runs` from these base options.
    ///
    /// `numRuns` is written first and caller env values are layered on top.
    /// The spec and group overrides replace the base values only when given.
    pub fn for_attempt(&self, num_runs: u32, group: Option<&str>, spec: Option<&[String]>) -> Self {
        let mut env = Map::new();
        env.insert("numRuns".to_string(), Value::from(num_runs));
        for (key, value) in &self.env {
            env.insert(key.clone(), value.clone());
        }

        let mut config = Self {
            env,
            ..self.clone()
        };
        if let Some(spec) = spec {
            config.spec = Some(spec.to_vec());
        }
        if let Some(group) = group {
            config.group = Some(group.to_string());
        }
        config
    }
}

/// Results resolved by `cypress.run()`.
///
/// A run that could not start at all (bad config, missing binary) resolves
/// with `failures` set and a `message` instead of per-spec results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_failed: u64,

    #[serde(default, deserialize_with = "lenient_count")]
    pub total_passed: u64,

    #[serde(default, deserialize_with = "lenient_count")]
    pub total_tests: u64,

    #[serde(default, deserialize_with = "lenient_count")]
    pub failures: u64,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub runs: Vec<SpecRun>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SpecRun {
    #[serde(default)]
    pub stats: SpecStats,
    pub spec: SpecFile,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SpecStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub failures: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SpecFile {
    pub relative: String,
}

impl RunResult {
    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        serde_json::from_str(raw).map_err(EngineError::Decode)
    }

    /// Relative paths of specs with at least one failure, in reported order
    pub fn failing_specs(&self) -> Vec<String> {
        self.runs
            .iter()
            .filter(|run| run.stats.failures > 0)
            .map(|run| run.spec.relative.clone())
            .collect()
    }
}

/// Counts arrive as numbers, but Cypress also uses `null`/`false` for "none".
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::Bool(true) => 1,
        _ => 0,
    })
}

#[async_trait]
pub trait Engine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run one suite invocation. An `Err` means the engine itself could not
    /// produce results.
    async fn execute(&self, config: &RunConfig) -> Result<RunResult, EngineError>;
}

use crate::error::OutputError;
use crate::runner::AttemptRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinalStatus {
    Passed,
    Exhausted,
    Error,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryReport {
    pub machine_id: String,
    pub status: FinalStatus,
    pub exit_code: i32,
    pub total_failures: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub attempts: Vec<AttemptSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub attempt: u32,
    pub started_at: String,
    pub duration_sec: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<Vec<String>>,
    pub total_failed: u64,
    pub failing_specs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&AttemptRecord> for AttemptSummary {
    fn from(record: &AttemptRecord) -> Self {
        Self {
            attempt: record.attempt,
            started_at: record.started_at.to_rfc3339(),
            duration_sec: record.duration.as_secs_f64(),
            group: record.group.clone(),
            spec: record.spec.clone(),
            total_failed: record.total_failed,
            failing_specs: record.failing_specs.clone(),
            error: record.error.clone(),
        }
    }
}

impl SummaryReport {
    pub fn new(
        machine_id: &str,
        status: FinalStatus,
        exit_code: i32,
        total_failures: u64,
        history: &[AttemptRecord],
    ) -> Self {
        Self {
            machine_id: machine_id.to_string(),
            status,
            exit_code,
            total_failures,
            error: None,
            attempts: history.iter().map(AttemptSummary::from).collect(),
        }
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

/// Write the attempt summary as pretty JSON, creating parent directories
pub fn write_summary(path: &Path, summary: &SummaryReport) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(OutputError::CreateDir)?;
    }

    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).map_err(OutputError::WriteSummary)?;
    Ok(())
}

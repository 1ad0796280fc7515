use crate::engine::{Engine, RunConfig, RunResult};
use crate::error::RetryError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Cross-attempt bookkeeping, owned by the orchestrator for its whole run
#[derive(Debug, Clone)]
pub struct RetryState {
    /// Number of attempts started so far
    pub attempt: u32,
    /// Sum of `totalFailed` over every failing attempt
    pub total_failures: u64,
    /// Random id shown in retry group labels
    pub machine_id: String,
}

impl RetryState {
    pub fn new(machine_id: String) -> Self {
        Self {
            attempt: 0,
            total_failures: 0,
            machine_id,
        }
    }
}

/// Six hex characters identifying this process in retry group labels
pub fn machine_id() -> String {
    let bytes: [u8; 3] = rand::random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn retry_group_label(group: &str, attempt: u32, spec_count: usize, machine_id: &str) -> String {
    format!(
        "{}: retry #{} ({} spec{} on {})",
        group,
        attempt,
        spec_count,
        if spec_count == 1 { "" } else { "s" },
        machine_id
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The last attempt ran clean
    Passed {
        result: RunResult,
        attempts: u32,
        total_failures: u64,
    },
    /// Every allowed attempt had failing tests
    Exhausted { attempts: u32, total_failures: u64 },
}

impl Outcome {
    /// Process exit code: 0 on success, otherwise the accumulated failure
    /// count kept inside the portable 1..=255 range.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Passed { .. } => 0,
            Outcome::Exhausted { total_failures, .. } => (*total_failures).clamp(1, 255) as i32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub attempt: u32,
    pub group: Option<String>,
    pub spec: Option<Vec<String>>,
    pub total_failed: u64,
    pub failing_specs: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    /// Set when the engine could not produce results for this attempt
    pub error: Option<String>,
}

pub struct Orchestrator {
    engine: Arc<dyn Engine>,
    base: RunConfig,
    retries: u32,
    state: RetryState,
    history: Vec<AttemptRecord>,
}

impl Orchestrator {
    pub fn new(engine: Arc<dyn Engine>, base: RunConfig, retries: u32) -> Self {
        Self::with_machine_id(engine, base, retries, machine_id())
    }

    pub fn with_machine_id(
        engine: Arc<dyn Engine>,
        base: RunConfig,
        retries: u32,
        machine_id: String,
    ) -> Self {
        Self {
            engine,
            base,
            retries,
            state: RetryState::new(machine_id),
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &RetryState {
        &self.state
    }

    pub fn history(&self) -> &[AttemptRecord] {
        &self.history
    }

    /// Run the suite, re-running only the failing specs, until a run passes,
    /// `retries` attempts have been made, or the engine fails outright.
    pub async fn run(&mut self) -> Result<Outcome, RetryError> {
        let mut group: Option<String> = None;
        let mut spec: Option<Vec<String>> = None;

        loop {
            self.state.attempt += 1;
            let num = self.state.attempt;

            let config = self.base.for_attempt(num, group.as_deref(), spec.as_deref());
            debug!(
                "Run #{} via {} (group: {:?}, specs: {:?})",
                num,
                self.engine.name(),
                config.group,
                config.spec
            );

            let started_at = Utc::now();
            let start = Instant::now();
            let executed = self.engine.execute(&config).await;

            let mut record = AttemptRecord {
                attempt: num,
                group: config.group,
                spec: config.spec,
                total_failed: 0,
                failing_specs: Vec::new(),
                started_at,
                duration: start.elapsed(),
                error: None,
            };
            let result = match executed {
                Ok(result) => result,
                Err(e) => {
                    record.error = Some(e.to_string());
                    self.history.push(record);
                    return Err(e.into());
                }
            };

            let failing_specs = result.failing_specs();
            record.total_failed = result.total_failed;
            record.failing_specs = failing_specs.clone();
            self.history.push(record);

            if result.total_failed > 0 {
                self.state.total_failures += result.total_failed;
                warn!("Run #{} failed.", num);

                if num >= self.retries {
                    warn!(
                        "Ran a total of '{}' times but still have failures. Exiting...",
                        self.retries
                    );
                    return Ok(Outcome::Exhausted {
                        attempts: num,
                        total_failures: self.state.total_failures,
                    });
                }

                if failing_specs.is_empty() {
                    return Err(RetryError::InconsistentResult {
                        attempt: num,
                        total_failed: result.total_failed,
                    });
                }

                info!("Retrying '{}' specs...", failing_specs.len());
                info!("{:?}", failing_specs);

                // Only grouped runs get a retry group
                group = self.base.group.as_deref().map(|g| {
                    retry_group_label(g, num, failing_specs.len(), &self.state.machine_id)
                });
                spec = Some(failing_specs);
                continue;
            }

            if result.failures > 0 {
                return Err(RetryError::EngineFailure {
                    failures: result.failures,
                    message: result.message,
                });
            }

            info!(
                "Run #{} passed ({} of {} tests)",
                num, result.total_passed, result.total_tests
            );
            return Ok(Outcome::Passed {
                result,
                attempts: num,
                total_failures: self.state.total_failures,
            });
        }
    }
}

use crate::cli::RunArgs;
use crate::config::Settings;
use crate::engine::{CypressEngine, RunConfig};
use crate::output::{write_summary, FinalStatus, SummaryReport};
use crate::runner::{Orchestrator, Outcome};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    let mut settings = Settings::resolve(args.settings.as_deref())?;
    if let Some(retries) = args.retries {
        settings.retries = retries;
    }
    settings.validate()?;

    let retries = settings.retries;
    let working_dir = match &args.project {
        Some(project) => absolute(project)?,
        None => settings.engine.project_dir.clone(),
    };
    let base = build_run_config(&args, &working_dir);

    let engine = Arc::new(CypressEngine {
        node_binary: settings.engine.node_binary.clone(),
        working_dir,
    });

    info!("Running Cypress with up to {} attempt(s)", retries);
    let mut orchestrator = Orchestrator::new(engine, base, retries);
    let result = orchestrator.run().await;

    let state = orchestrator.state();
    let summary = match &result {
        Ok(outcome) => {
            let status = match outcome {
                Outcome::Passed { .. } => FinalStatus::Passed,
                Outcome::Exhausted { .. } => FinalStatus::Exhausted,
            };
            SummaryReport::new(
                &state.machine_id,
                status,
                outcome.exit_code(),
                state.total_failures,
                orchestrator.history(),
            )
        }
        Err(e) => SummaryReport::new(
            &state.machine_id,
            FinalStatus::Error,
            1,
            state.total_failures,
            orchestrator.history(),
        )
        .with_error(e),
    };

    if let Some(path) = &args.summary {
        match write_summary(path, &summary) {
            Ok(()) => info!("Wrote summary: {}", path.display()),
            Err(e) => warn!("Failed to write summary to {}: {}", path.display(), e),
        }
    }

    match result? {
        Outcome::Passed { attempts, .. } => {
            info!("All specs passed after {} run(s)", attempts);
            Ok(())
        }
        outcome @ Outcome::Exhausted { .. } => {
            let code = outcome.exit_code();
            error!(
                "Exiting with code {} ({} failure(s) across all runs)",
                code, state.total_failures
            );
            std::process::exit(code);
        }
    }
}

/// Base options shared by every attempt
fn build_run_config(args: &RunArgs, working_dir: &Path) -> RunConfig {
    RunConfig {
        record: args.record,
        key: args.key.clone(),
        spec: args.spec.clone(),
        reporter: args.reporter.clone(),
        reporter_options: args.reporter_options.clone(),
        port: args.port,
        env: args
            .env
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
            .collect(),
        config: args.config.clone().unwrap_or_default(),
        browser: args.browser.clone(),
        project: args.project.as_ref().map(|_| working_dir.to_path_buf()),
        parallel: args.parallel,
        group: args.group.clone(),
        ci_build_id: args.ci_build_id.clone(),
        exit: args.no_exit.then_some(false),
        headed: args.headed,
        dev: args.dev,
    }
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

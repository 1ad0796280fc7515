use super::{Engine, RunConfig, RunResult};
use crate::error::EngineError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Reads the run config from stdin, hands it to the Cypress module API and
/// writes the resolved results to the path given as the first argument.
const RUN_SHIM: &str = r#"
const fs = require('fs');
let input = '';
process.stdin.setEncoding('utf8');
process.stdin.on('data', chunk => { input += chunk; });
process.stdin.on('end', () => {
  require('cypress')
    .run(JSON.parse(input))
    .then(results => fs.writeFileSync(process.argv[1], JSON.stringify(results)))
    .catch(err => {
      console.error(err && err.stack ? err.stack : err);
      process.exit(1);
    });
});
"#;

pub struct CypressEngine {
    pub node_binary: PathBuf,
    pub working_dir: PathBuf,
}

#[async_trait]
impl Engine for CypressEngine {
    fn name(&self) -> &'static str {
        "cypress"
    }

    async fn execute(&self, config: &RunConfig) -> Result<RunResult, EngineError> {
        let payload = serde_json::to_vec(config).map_err(EngineError::Encode)?;

        // Cypress writes here; the file is removed when `out_file` drops
        let out_file = NamedTempFile::new()?;
        let out_path = out_file.path().to_path_buf();

        // Use string for PATH lookup if not an absolute/relative path
        let binary_str = self.node_binary.to_string_lossy();
        let mut cmd = if binary_str.contains('/') || binary_str.contains('\\') {
            Command::new(&self.node_binary)
        } else {
            Command::new(binary_str.as_ref())
        };

        cmd.arg("-e").arg(RUN_SHIM).arg(&out_path);
        cmd.current_dir(&self.working_dir);

        // Test output goes straight to the terminal
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        debug!(
            "Launching {:?} in {:?} (results -> {:?})",
            self.node_binary, self.working_dir, out_path
        );

        let mut child = cmd.spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload).await?;
            stdin.shutdown().await?;
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(EngineError::NonZeroExit(status.code().unwrap_or(-1)));
        }

        let raw = tokio::fs::read_to_string(&out_path)
            .await
            .map_err(|e| EngineError::ReadResults {
                path: out_path.clone(),
                source: e,
            })?;

        RunResult::from_json(&raw)
    }
}

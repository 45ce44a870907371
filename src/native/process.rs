use std::process::Stdio;

use tokio::process::Command;
use tokio::time::{Instant, timeout};

use crate::core::traits::process::{Invocation, ProcessRunner, RunError, RunResult};

/// Spawns children straight on the host with `tokio::process`. The only limit
/// enforced is wall-clock time; a timed-out child is killed when its handle drops.
#[derive(Clone, Debug, Default)]
pub struct NativeProcessRunner;

impl NativeProcessRunner {
    pub fn new() -> Self {
        NativeProcessRunner
    }
}

#[async_trait::async_trait]
impl ProcessRunner for NativeProcessRunner {
    #[tracing::instrument(skip(self, invocation), fields(program = %invocation.program.display()))]
    async fn run(&self, invocation: &Invocation) -> Result<RunResult, RunError> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start_time = Instant::now();
        let child = cmd.spawn().map_err(|e| RunError::Internal {
            msg: format!("Failed to spawn {}: {}", invocation.program.display(), e),
        })?;
        tracing::debug!("Spawned process with args {:?}", invocation.args);

        let output_result = match invocation.time_limit {
            Some(limit) => match timeout(limit, child.wait_with_output()).await {
                Ok(result) => result,
                Err(_) => {
                    // Dropping the wait future drops the child, and kill_on_drop reaps it
                    let limit_ms = limit.as_millis() as u64;
                    tracing::warn!(limit_ms, "Process killed after exceeding time limit");
                    return Err(RunError::TimedOut { limit_ms });
                }
            },
            None => child.wait_with_output().await,
        };

        let output = output_result.map_err(|e| RunError::Internal {
            msg: format!("Failed to wait for process: {}", e),
        })?;
        let execution_time_ms = start_time.elapsed().as_millis() as u64;

        let result = RunResult {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            execution_time_ms,
        };
        tracing::debug!(
            status = result.status,
            execution_time_ms,
            stderr_len = result.stderr.len(),
            "Process exited"
        );

        Ok(result)
    }
}

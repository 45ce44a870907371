//! One runner per supported language. Each runner writes its scratch files,
//! optionally compiles, runs the program under a wall-clock limit and decodes the
//! output. Runners never return errors: every failure ends up in the
//! `ExecutionResult`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::{NamedTempFile, TempDir};

use crate::config::EngineConfig;
use crate::constants::{COMPILATION_TIMED_OUT_MSG, EXECUTION_TIMED_OUT_MSG};
use crate::core::domain::{ErrorType, ExecutionResult};
use crate::core::traits::process::{Invocation, ProcessRunner, RunError, RunResult};

pub mod cpp;
pub mod java;
pub mod javascript;
pub mod python;

#[derive(Clone, Debug, PartialEq)]
pub struct RunnerSettings {
    pub scratch_dir: PathBuf,
    pub run_timeout: Duration,
    pub compile_timeout: Duration,
}

impl From<&EngineConfig> for RunnerSettings {
    fn from(config: &EngineConfig) -> Self {
        RunnerSettings {
            scratch_dir: config.scratch_dir.clone(),
            run_timeout: config.run_timeout,
            compile_timeout: config.compile_timeout,
        }
    }
}

/// Failure to set up scratch space is a runner-level exception and is reported
/// as a runtime error of the batch.
fn scratch_failure(e: std::io::Error) -> ExecutionResult {
    tracing::error!("Failed to prepare scratch space: {}", e);
    ExecutionResult::failure(ErrorType::Runtime, format!("Failed to prepare scratch space: {}", e))
}

fn run_failure(err: RunError) -> ExecutionResult {
    match err {
        RunError::TimedOut { .. } => {
            ExecutionResult::failure(ErrorType::Timeout, EXECUTION_TIMED_OUT_MSG)
        }
        RunError::Internal { msg } => {
            tracing::error!("Internal error while running: {}", msg);
            ExecutionResult::failure(ErrorType::Runtime, msg)
        }
    }
}

/// Applies the stderr rule, then hands stdout to the protocol decoder.
fn decode_run(result: RunResult, decode: fn(&str) -> ExecutionResult) -> ExecutionResult {
    if !result.stderr.is_empty() {
        return ExecutionResult::failure(ErrorType::Runtime, result.stderr);
    }
    if !result.success() {
        tracing::warn!(status = result.status, "Process exited abnormally without stderr");
    }
    decode(&result.stdout)
}

/// Writes an interpreted program to a fresh temp file, runs it and decodes the
/// JSON envelope. The file is removed when this returns, on every path.
async fn run_script(
    process: &dyn ProcessRunner,
    interpreter: &Path,
    settings: &RunnerSettings,
    suffix: &str,
    source: &str,
    decode: fn(&str) -> ExecutionResult,
) -> ExecutionResult {
    let script = match script_file(&settings.scratch_dir, suffix, source).await {
        Ok(script) => script,
        Err(e) => return scratch_failure(e),
    };

    let invocation = Invocation::new(interpreter, &settings.scratch_dir)
        .arg(script.path().to_string_lossy())
        .time_limit(settings.run_timeout);

    match process.run(&invocation).await {
        Ok(result) => decode_run(result, decode),
        Err(err) => run_failure(err),
    }
}

async fn script_file(scratch_dir: &Path, suffix: &str, source: &str) -> std::io::Result<NamedTempFile> {
    tokio::fs::create_dir_all(scratch_dir).await?;
    let script = tempfile::Builder::new()
        .prefix("submission-")
        .suffix(suffix)
        .tempfile_in(scratch_dir)?;
    tokio::fs::write(script.path(), source).await?;
    Ok(script)
}

async fn workspace(scratch_dir: &Path, files: &[(&str, String)]) -> std::io::Result<TempDir> {
    tokio::fs::create_dir_all(scratch_dir).await?;
    let dir = tempfile::Builder::new().prefix("judge-").tempdir_in(scratch_dir)?;
    for (name, contents) in files {
        tokio::fs::write(dir.path().join(name), contents).await?;
    }
    Ok(dir)
}

/// Runs a compiler invocation. `Err` carries the batch result to report when
/// compilation did not succeed.
async fn compile(process: &dyn ProcessRunner, invocation: &Invocation) -> Result<(), ExecutionResult> {
    tracing::debug!("Start compiling");
    match process.run(invocation).await {
        Ok(result) if result.success() => Ok(()),
        Ok(result) => {
            let diagnostics = if result.stderr.trim().is_empty() {
                result.stdout
            } else {
                result.stderr
            };
            tracing::debug!("Compilation failed with status {}", result.status);
            Err(ExecutionResult::failure(ErrorType::Compilation, diagnostics))
        }
        Err(RunError::TimedOut { .. }) => Err(ExecutionResult::failure(
            ErrorType::Timeout,
            COMPILATION_TIMED_OUT_MSG,
        )),
        Err(err) => Err(run_failure(err)),
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

/// A single child-process launch: what to run, where, and for how long at most.
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub time_limit: Option<Duration>,
}

impl Invocation {
    pub fn new<T, U>(program: T, cwd: U) -> Self
    where
        T: AsRef<Path>,
        U: AsRef<Path>,
    {
        Invocation {
            program: program.as_ref().into(),
            args: Vec::new(),
            cwd: cwd.as_ref().into(),
            time_limit: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunResult {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
    pub execution_time_ms: u64,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError {
    #[error("process exceeded the {limit_ms}ms wall-clock limit")]
    TimedOut { limit_ms: u64 },
    #[error("{msg}")]
    Internal { msg: String },
}

#[mockall::automock]
#[async_trait::async_trait]
pub trait ProcessRunner: std::fmt::Debug + Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<RunResult, RunError>;
}

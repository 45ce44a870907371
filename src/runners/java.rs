use std::path::PathBuf;
use std::sync::Arc;

use crate::core::domain::{ExecutionResult, JudgeJob, Language};
use crate::core::traits::process::{Invocation, ProcessRunner};
use crate::core::traits::runner::LanguageRunner;
use crate::harness::{java, protocol};
use crate::runners::{RunnerSettings, compile, decode_run, run_failure, scratch_failure, workspace};

#[derive(Debug)]
pub struct JavaRunner {
    process: Arc<dyn ProcessRunner>,
    javac: PathBuf,
    java: PathBuf,
    settings: RunnerSettings,
}

impl JavaRunner {
    pub fn new<T, U>(process: Arc<dyn ProcessRunner>, javac: T, java: U, settings: RunnerSettings) -> Self
    where
        T: Into<PathBuf>,
        U: Into<PathBuf>,
    {
        JavaRunner {
            process,
            javac: javac.into(),
            java: java.into(),
            settings,
        }
    }
}

#[async_trait::async_trait]
impl LanguageRunner for JavaRunner {
    fn language(&self) -> Language {
        Language::Java
    }

    #[tracing::instrument(skip_all, fields(function = %job.function_name, cases = job.testcases.len()))]
    async fn run(&self, job: &JudgeJob) -> ExecutionResult {
        let files = [
            (java::SOLUTION_FILE, java::solution_source(job)),
            (java::DRIVER_FILE, java::generate_driver(job)),
        ];
        let dir = match workspace(&self.settings.scratch_dir, &files).await {
            Ok(dir) => dir,
            Err(e) => return scratch_failure(e),
        };

        let javac = Invocation::new(&self.javac, dir.path())
            .arg("-encoding")
            .arg("UTF-8")
            .arg(java::SOLUTION_FILE)
            .arg(java::DRIVER_FILE)
            .time_limit(self.settings.compile_timeout);
        if let Err(failure) = compile(self.process.as_ref(), &javac).await {
            return failure;
        }

        tracing::debug!("Start running");
        let run = Invocation::new(&self.java, dir.path())
            .arg("-cp")
            .arg(dir.path().to_string_lossy())
            .arg(java::DRIVER_CLASS)
            .time_limit(self.settings.run_timeout);
        match self.process.run(&run).await {
            Ok(result) => decode_run(result, protocol::decode_tagged),
            Err(err) => run_failure(err),
        }
    }
}

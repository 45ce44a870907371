use std::path::PathBuf;
use std::sync::Arc;

use crate::core::domain::{ExecutionResult, JudgeJob, Language};
use crate::core::traits::process::ProcessRunner;
use crate::core::traits::runner::LanguageRunner;
use crate::harness::{protocol, python};
use crate::runners::{RunnerSettings, run_script};

#[derive(Debug)]
pub struct PythonRunner {
    process: Arc<dyn ProcessRunner>,
    interpreter: PathBuf,
    settings: RunnerSettings,
}

impl PythonRunner {
    pub fn new<T>(process: Arc<dyn ProcessRunner>, interpreter: T, settings: RunnerSettings) -> Self
    where
        T: Into<PathBuf>,
    {
        PythonRunner {
            process,
            interpreter: interpreter.into(),
            settings,
        }
    }
}

#[async_trait::async_trait]
impl LanguageRunner for PythonRunner {
    fn language(&self) -> Language {
        Language::Python
    }

    #[tracing::instrument(skip_all, fields(function = %job.function_name, cases = job.testcases.len()))]
    async fn run(&self, job: &JudgeJob) -> ExecutionResult {
        let source = python::generate(job);
        run_script(
            self.process.as_ref(),
            &self.interpreter,
            &self.settings,
            ".py",
            &source,
            protocol::decode_envelope,
        )
        .await
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::domain::{ExecutionResult, JudgeJob, Language};
use crate::core::traits::process::ProcessRunner;
use crate::core::traits::runner::LanguageRunner;
use crate::harness::{javascript, protocol};
use crate::runners::{RunnerSettings, run_script};

#[derive(Debug)]
pub struct JavaScriptRunner {
    process: Arc<dyn ProcessRunner>,
    node: PathBuf,
    settings: RunnerSettings,
}

impl JavaScriptRunner {
    pub fn new<T>(process: Arc<dyn ProcessRunner>, node: T, settings: RunnerSettings) -> Self
    where
        T: Into<PathBuf>,
    {
        JavaScriptRunner {
            process,
            node: node.into(),
            settings,
        }
    }
}

#[async_trait::async_trait]
impl LanguageRunner for JavaScriptRunner {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    #[tracing::instrument(skip_all, fields(function = %job.function_name, cases = job.testcases.len()))]
    async fn run(&self, job: &JudgeJob) -> ExecutionResult {
        let source = javascript::generate(job);
        run_script(
            self.process.as_ref(),
            &self.node,
            &self.settings,
            ".js",
            &source,
            protocol::decode_envelope,
        )
        .await
    }
}

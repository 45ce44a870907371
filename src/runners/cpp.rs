use std::path::PathBuf;
use std::sync::Arc;

use crate::core::domain::{ExecutionResult, JudgeJob, Language};
use crate::core::traits::process::{Invocation, ProcessRunner};
use crate::core::traits::runner::LanguageRunner;
use crate::harness::{cpp, protocol};
use crate::runners::{RunnerSettings, compile, decode_run, run_failure, scratch_failure, workspace};

#[derive(Debug)]
pub struct CppRunner {
    process: Arc<dyn ProcessRunner>,
    gnucpp_path: PathBuf,
    settings: RunnerSettings,
}

impl CppRunner {
    pub fn new<T>(process: Arc<dyn ProcessRunner>, gnucpp_path: T, settings: RunnerSettings) -> Self
    where
        T: Into<PathBuf>,
    {
        CppRunner {
            process,
            gnucpp_path: gnucpp_path.into(),
            settings,
        }
    }
}

#[async_trait::async_trait]
impl LanguageRunner for CppRunner {
    fn language(&self) -> Language {
        Language::Cpp
    }

    #[tracing::instrument(skip_all, fields(function = %job.function_name, cases = job.testcases.len()))]
    async fn run(&self, job: &JudgeJob) -> ExecutionResult {
        let files = [
            (cpp::SOLUTION_FILE, cpp::solution_source(job)),
            (cpp::DRIVER_FILE, cpp::generate_driver(job)),
        ];
        let dir = match workspace(&self.settings.scratch_dir, &files).await {
            Ok(dir) => dir,
            Err(e) => return scratch_failure(e),
        };

        let gpp = Invocation::new(&self.gnucpp_path, dir.path())
            .arg("-std=c++17")
            .arg("-O2")
            .arg("-o")
            .arg(cpp::BINARY_FILE)
            .arg(cpp::DRIVER_FILE)
            .time_limit(self.settings.compile_timeout);
        if let Err(failure) = compile(self.process.as_ref(), &gpp).await {
            return failure;
        }

        tracing::debug!("Start running");
        let run = Invocation::new(dir.path().join(cpp::BINARY_FILE), dir.path())
            .time_limit(self.settings.run_timeout);
        match self.process.run(&run).await {
            Ok(result) => decode_run(result, protocol::decode_tagged),
            Err(err) => run_failure(err),
        }
    }
}

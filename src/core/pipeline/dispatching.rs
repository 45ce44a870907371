use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    config::EngineConfig,
    core::{
        domain::{ExecutionResult, JudgeJob, Language},
        errors::EngineError,
        traits::{process::ProcessRunner, runner::LanguageRunner},
    },
    native::process::NativeProcessRunner,
    runners::{
        RunnerSettings, cpp::CppRunner, java::JavaRunner, javascript::JavaScriptRunner,
        python::PythonRunner,
    },
};

/// Routes a job to the runner registered for its language.
#[derive(Debug)]
pub struct Dispatcher {
    runners: HashMap<Language, Arc<dyn LanguageRunner>>,
}

impl Dispatcher {
    /// A later runner for the same language replaces an earlier one.
    pub fn new(runners: Vec<Arc<dyn LanguageRunner>>) -> Self {
        let runners = runners
            .into_iter()
            .map(|runner| (runner.language(), runner))
            .collect();
        Dispatcher { runners }
    }

    /// All four runners backed by real child processes.
    pub fn native(config: &EngineConfig) -> Self {
        let process: Arc<dyn ProcessRunner> = Arc::new(NativeProcessRunner::new());
        let settings = RunnerSettings::from(config);
        let toolchain = &config.toolchain;

        Dispatcher::new(vec![
            Arc::new(PythonRunner::new(
                process.clone(),
                toolchain.python.clone(),
                settings.clone(),
            )),
            Arc::new(JavaScriptRunner::new(
                process.clone(),
                toolchain.node.clone(),
                settings.clone(),
            )),
            Arc::new(JavaRunner::new(
                process.clone(),
                toolchain.javac.clone(),
                toolchain.java.clone(),
                settings.clone(),
            )),
            Arc::new(CppRunner::new(process, toolchain.gnucpp.clone(), settings)),
        ])
    }

    pub fn resolve(&self, language: &str) -> Result<Arc<dyn LanguageRunner>, EngineError> {
        let language: Language = language.parse()?;
        self.runners
            .get(&language)
            .cloned()
            .ok_or_else(|| EngineError::UnsupportedLanguage(language.to_string()))
    }

    #[tracing::instrument(skip(self, job), fields(cases = job.testcases.len()))]
    pub async fn dispatch(&self, language: &str, job: &JudgeJob) -> Result<ExecutionResult, EngineError> {
        let runner = self.resolve(language)?;
        tracing::debug!("Dispatching to {} runner", runner.language());
        Ok(runner.run(job).await)
    }
}

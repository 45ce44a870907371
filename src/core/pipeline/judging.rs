use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, SemaphorePermit};
use uuid::Uuid;

use crate::{
    config::EngineConfig,
    core::{
        comparison,
        domain::{JudgeReport, JudgeRequest, round2},
        errors::EngineError,
        pipeline::dispatching::Dispatcher,
    },
};

/// Entry point of the engine: admits a request, runs it and grades the outputs.
///
/// At most `max_concurrent` judgings hold a slot at once; the rest queue. With a
/// `queue_timeout`, a caller that waits longer than that gets
/// `EngineError::Saturated` instead.
#[derive(Clone, Debug)]
pub struct Judge {
    dispatcher: Arc<Dispatcher>,
    slots: Arc<Semaphore>,
    queue_timeout: Option<Duration>,
}

impl Judge {
    pub fn new(dispatcher: Arc<Dispatcher>, max_concurrent: usize, queue_timeout: Option<Duration>) -> Self {
        Judge {
            dispatcher,
            slots: Arc::new(Semaphore::new(max_concurrent)),
            queue_timeout,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Judge::new(
            Arc::new(Dispatcher::native(config)),
            config.max_concurrent_judgings,
            config.queue_timeout,
        )
    }

    /// Stops admitting work. Queued and future calls fail with `EngineError::Closed`.
    pub fn close(&self) {
        self.slots.close();
    }

    async fn admit(&self) -> Result<SemaphorePermit<'_>, EngineError> {
        match self.queue_timeout {
            Some(limit) => tokio::time::timeout(limit, self.slots.acquire())
                .await
                .map_err(|_| EngineError::Saturated {
                    waited_ms: limit.as_millis() as u64,
                })?
                .map_err(|_| EngineError::Closed),
            None => self.slots.acquire().await.map_err(|_| EngineError::Closed),
        }
    }

    #[tracing::instrument(skip_all, fields(judging_id = tracing::field::Empty, language = %request.language))]
    pub async fn judge(&self, request: &JudgeRequest) -> Result<JudgeReport, EngineError> {
        let id = Uuid::new_v4();
        tracing::Span::current().record("judging_id", tracing::field::display(id));
        let started_at = chrono::Utc::now();

        let runner = self.dispatcher.resolve(&request.language)?;
        let job = request.to_job();

        let permit = self.admit().await.inspect_err(|e| {
            tracing::warn!("Judging rejected: {}", e);
        })?;
        tracing::debug!("Start judging {} test cases", job.testcases.len());
        let execution = runner.run(&job).await;
        drop(permit);

        let verdicts = comparison::judge(&execution, &job.testcases);
        let status = comparison::overall_status(&execution, &verdicts);
        let passed = verdicts.iter().filter(|v| v.passed).count();
        tracing::info!(?status, passed, total = verdicts.len(), "Judging finished");

        Ok(JudgeReport {
            id,
            language: runner.language(),
            status,
            passed,
            total: verdicts.len(),
            runtime: round2(execution.runtimes.iter().sum()),
            memory: round2(execution.memory),
            console_output: execution.stdout.clone(),
            error: execution.error_message(),
            error_type: execution.error_type,
            execution,
            verdicts,
            started_at,
            finished_at: chrono::Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        domain::{ErrorType, ExecutionResult, JudgeJob, Language, OverallStatus, TestCase},
        traits::runner::{LanguageRunner, MockLanguageRunner},
    };
    use serde_json::json;
    use tokio::sync::Notify;

    fn request(language: &str) -> JudgeRequest {
        let mut first = TestCase::new(vec![json!(2), json!(3)], json!(5));
        first.order = 2;
        let mut second = TestCase::new(vec![json!(1), json!(1)], json!("2"));
        second.order = 1;

        JudgeRequest {
            language: language.to_string(),
            code: "def add(a, b):\n    return a + b\n".to_string(),
            function_name: "add".to_string(),
            parameters: vec![],
            testcases: vec![first, second],
        }
    }

    fn judge_with(runner: MockLanguageRunner, max_concurrent: usize) -> Judge {
        let dispatcher = Dispatcher::new(vec![Arc::new(runner)]);
        Judge::new(Arc::new(dispatcher), max_concurrent, None)
    }

    #[tokio::test]
    async fn test_accepted_report() {
        let mut runner = MockLanguageRunner::new();
        runner.expect_language().return_const(Language::Python);
        runner
            .expect_run()
            .withf(|job: &JudgeJob| job.testcases[0].order == 1 && job.testcases[1].order == 2)
            .times(1)
            .return_const(ExecutionResult {
                outputs: vec![json!(2), json!(5)],
                runtimes: vec![0.123, 0.456],
                memory: 1.2345,
                stdout: "debug".to_string(),
                ..Default::default()
            });

        let report = judge_with(runner, 1).judge(&request("python")).await.unwrap();

        assert_eq!(report.status, OverallStatus::Accepted);
        assert_eq!(report.language, Language::Python);
        assert_eq!((report.passed, report.total), (2, 2));
        assert_eq!(report.runtime, 0.58);
        assert_eq!(report.memory, 1.23);
        assert_eq!(report.console_output, "debug");
        assert_eq!(report.error, "");
        assert_eq!(report.verdicts[0].expected, json!("2"));
        assert!(report.started_at <= report.finished_at);
    }

    #[tokio::test]
    async fn test_batch_error_report() {
        let mut runner = MockLanguageRunner::new();
        runner.expect_language().return_const(Language::Cpp);
        runner.expect_run().return_const(ExecutionResult::failure(
            ErrorType::Compilation,
            "main.cpp:1: error: expected ';'",
        ));

        let report = judge_with(runner, 2).judge(&request("cpp")).await.unwrap();

        assert_eq!(report.status, OverallStatus::WrongAnswer);
        assert_eq!(report.passed, 0);
        assert_eq!(report.error, "Compilation Error:\nmain.cpp:1: error: expected ';'");
        assert_eq!(report.error_type, Some(ErrorType::Compilation));
        assert!(report.verdicts.iter().all(|v| v.error_type == Some(ErrorType::Compilation)));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], json!("Wrong Answer"));
        assert_eq!(json["error_type"], json!("Compilation Error"));
        assert_eq!(json["language"], json!("cpp"));
    }

    #[tokio::test]
    async fn test_unsupported_language_is_rejected_before_running() {
        let mut runner = MockLanguageRunner::new();
        runner.expect_language().return_const(Language::Python);
        runner.expect_run().never();

        let err = judge_with(runner, 1).judge(&request("cobol")).await.unwrap_err();
        assert_eq!(err, EngineError::UnsupportedLanguage("cobol".to_string()));
    }

    #[tokio::test]
    async fn test_closed_gate() {
        let mut runner = MockLanguageRunner::new();
        runner.expect_language().return_const(Language::Python);
        runner.expect_run().never();

        let judge = judge_with(runner, 1);
        judge.close();

        let err = judge.judge(&request("python")).await.unwrap_err();
        assert_eq!(err, EngineError::Closed);
    }

    #[derive(Debug)]
    struct HeldRunner {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait::async_trait]
    impl LanguageRunner for HeldRunner {
        fn language(&self) -> Language {
            Language::Python
        }

        async fn run(&self, _job: &JudgeJob) -> ExecutionResult {
            self.started.notify_one();
            self.release.notified().await;
            ExecutionResult::default()
        }
    }

    #[tokio::test]
    async fn test_saturated_when_no_slot_frees_up() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let runner = HeldRunner {
            started: started.clone(),
            release: release.clone(),
        };
        let dispatcher = Dispatcher::new(vec![Arc::new(runner)]);
        let judge = Judge::new(Arc::new(dispatcher), 1, Some(Duration::from_millis(50)));

        let holder = {
            let judge = judge.clone();
            tokio::spawn(async move { judge.judge(&request("python")).await })
        };
        started.notified().await;

        let err = judge.judge(&request("python")).await.unwrap_err();
        assert_eq!(err, EngineError::Saturated { waited_ms: 50 });

        release.notify_one();
        let report = holder.await.unwrap().unwrap();
        assert_eq!(report.total, 2);
    }
}

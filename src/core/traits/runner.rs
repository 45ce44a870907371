use crate::core::domain::{ExecutionResult, JudgeJob, Language};

/// Owns the full process lifecycle of one language. Implementations never fail:
/// every problem is folded into the returned `ExecutionResult`.
#[mockall::automock]
#[async_trait::async_trait]
pub trait LanguageRunner: std::fmt::Debug + Send + Sync {
    fn language(&self) -> Language;

    async fn run(&self, job: &JudgeJob) -> ExecutionResult;
}

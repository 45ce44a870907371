/// Failures that reject a judging call outright. Everything that goes wrong while a
/// submission is compiled or executed is reported inside `ExecutionResult` instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("No execution slot became free within {waited_ms}ms")]
    Saturated { waited_ms: u64 },
    #[error("Admission gate is closed")]
    Closed,
}

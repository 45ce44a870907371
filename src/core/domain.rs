use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::core::errors::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    Java,
    Cpp,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Python,
        Language::JavaScript,
        Language::Java,
        Language::Cpp,
    ];

    pub fn identifier(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Java => "java",
            Language::Cpp => "cpp",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Language {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.identifier() == wanted)
            .ok_or_else(|| EngineError::UnsupportedLanguage(s.to_string()))
    }
}

/// A declared function parameter of the problem being judged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: String,
}

impl Parameter {
    pub fn new(name: &str, declared_type: &str) -> Self {
        Parameter {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(deserialize_with = "one_or_many")]
    pub input: Vec<Value>,
    pub expected_output: Value,
    #[serde(default)]
    pub order: i64,
}

impl TestCase {
    pub fn new(input: Vec<Value>, expected_output: Value) -> Self {
        TestCase {
            input,
            expected_output,
            order: 0,
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        scalar => vec![scalar],
    })
}

/// Everything a language runner needs to execute one batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JudgeJob {
    pub code: String,
    pub function_name: String,
    pub parameters: Vec<Parameter>,
    pub testcases: Vec<TestCase>,
}

impl JudgeJob {
    pub fn parameter_type(&self, idx: usize) -> Option<&str> {
        self.parameters
            .get(idx)
            .map(|param| param.declared_type.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "Compilation Error")]
    Compilation,
    #[serde(rename = "Runtime Error")]
    Runtime,
    #[serde(rename = "Timeout Error")]
    Timeout,
    #[serde(rename = "Internal Error")]
    Internal,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorType::Compilation => "Compilation Error",
            ErrorType::Runtime => "Runtime Error",
            ErrorType::Timeout => "Timeout Error",
            ErrorType::Internal => "Internal Error",
        })
    }
}

/// Raw outcome of running one submission against its whole batch of test cases.
///
/// Either `error` is `None` and `outputs` holds at most one value per test case,
/// or `error` is set and `outputs` is empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub outputs: Vec<Value>,
    pub runtimes: Vec<f64>,
    pub memory: f64,
    pub stdout: String,
    pub error: Option<String>,
    pub error_type: Option<ErrorType>,
}

impl ExecutionResult {
    pub fn failure(error_type: ErrorType, error: impl Into<String>) -> Self {
        ExecutionResult {
            error: Some(error.into()),
            error_type: Some(error_type),
            ..Default::default()
        }
    }

    pub fn with_stdout(self, stdout: impl Into<String>) -> Self {
        ExecutionResult {
            stdout: stdout.into(),
            ..self
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Error text as shown to the submitter, prefixed with its type when known.
    pub fn error_message(&self) -> String {
        match (&self.error_type, &self.error) {
            (Some(error_type), Some(error)) => format!("{}:\n{}", error_type, error),
            (None, Some(error)) => error.clone(),
            _ => String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Verdict {
    pub input: Vec<Value>,
    pub expected: Value,
    pub actual: Value,
    pub passed: bool,
    pub runtime: f64,
    pub error: Option<String>,
    pub error_type: Option<ErrorType>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    Accepted,
    #[serde(rename = "Wrong Answer")]
    WrongAnswer,
    Error,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct JudgeRequest {
    pub language: String,
    pub code: String,
    pub function_name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub testcases: Vec<TestCase>,
}

impl JudgeRequest {
    /// Builds the runner job, with test cases in ascending `order`.
    pub fn to_job(&self) -> JudgeJob {
        let mut testcases = self.testcases.clone();
        testcases.sort_by_key(|tc| tc.order);

        JudgeJob {
            code: self.code.clone(),
            function_name: self.function_name.clone(),
            parameters: self.parameters.clone(),
            testcases,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JudgeReport {
    pub id: Uuid,
    pub language: Language,
    pub status: OverallStatus,
    pub passed: usize,
    pub total: usize,
    pub runtime: f64,
    pub memory: f64,
    pub console_output: String,
    pub error: String,
    pub error_type: Option<ErrorType>,
    pub execution: ExecutionResult,
    pub verdicts: Vec<Verdict>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! Turns a batch `ExecutionResult` into per-case verdicts.
//!
//! Values from different harnesses arrive in different shapes: a Python list, the
//! text a C++ driver printed, an expected output stored as a JSON-encoded string.
//! Both sides are normalized and then compared on a canonical, whitespace-free
//! rendering, so `"[1, 2]"`, `[1,2]` and `" [1,2] "` are all the same answer.

use serde_json::Value;

use crate::core::domain::{ExecutionResult, OverallStatus, TestCase, Verdict};

pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.eq_ignore_ascii_case("true") {
                Value::Bool(true)
            } else if trimmed.eq_ignore_ascii_case("false") {
                Value::Bool(false)
            } else {
                match serde_json::from_str::<Value>(trimmed) {
                    Ok(parsed) => normalize(&parsed),
                    Err(_) => Value::String(trimmed.to_string()),
                }
            }
        }
        other => other.clone(),
    }
}

/// A top-level string renders as its raw text, anything else as compact JSON.
pub fn canonical(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn compare(actual: &Value, expected: &Value) -> bool {
    let strip = |value: &Value| -> String {
        canonical(&normalize(value))
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    };
    strip(actual) == strip(expected)
}

pub fn judge(exec: &ExecutionResult, testcases: &[TestCase]) -> Vec<Verdict> {
    if exec.is_failure() && exec.outputs.is_empty() {
        return testcases
            .iter()
            .map(|tc| Verdict {
                input: tc.input.clone(),
                expected: tc.expected_output.clone(),
                actual: Value::Null,
                passed: false,
                runtime: 0.0,
                error: exec.error.clone(),
                error_type: exec.error_type,
            })
            .collect();
    }

    testcases
        .iter()
        .enumerate()
        .map(|(idx, tc)| {
            let actual = exec.outputs.get(idx).cloned().unwrap_or(Value::Null);
            let passed = compare(&actual, &tc.expected_output);
            let missing = idx >= exec.outputs.len();
            let (error, error_type) = if !passed && missing {
                (exec.error.clone(), exec.error_type)
            } else {
                (None, None)
            };

            Verdict {
                input: tc.input.clone(),
                expected: tc.expected_output.clone(),
                actual,
                passed,
                runtime: exec.runtimes.get(idx).copied().unwrap_or(0.0),
                error,
                error_type,
            }
        })
        .collect()
}

pub fn overall_status(exec: &ExecutionResult, verdicts: &[Verdict]) -> OverallStatus {
    if !verdicts.is_empty() && verdicts.iter().all(|v| v.passed) {
        OverallStatus::Accepted
    } else if exec.is_failure() && verdicts.is_empty() {
        OverallStatus::Error
    } else {
        OverallStatus::WrongAnswer
    }
}

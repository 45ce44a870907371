//! Decoding of the harness output stream.
//!
//! Every harness prints `RESULT_SENTINEL` on its own line. What comes before it is
//! console output of the submission. What follows is either a JSON envelope
//! (interpreted languages) or a stream of `RES:`/`TIME:`/`ERR:` lines (compiled).

use serde::Deserialize;
use serde_json::Value;

use crate::constants::{ERROR_TAG, JUDGE_FAILED_MSG, RESULT_SENTINEL, RESULT_TAG, TIME_TAG};
use crate::core::domain::{ErrorType, ExecutionResult};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    runtimes: Vec<f64>,
    #[serde(default)]
    peak_memory: f64,
}

/// Decodes `console ++ SENTINEL ++ {results, runtimes, peak_memory}`.
///
/// The envelope is the very last thing an interpreted harness prints, so the
/// split happens at the last sentinel.
pub fn decode_envelope(stdout: &str) -> ExecutionResult {
    let Some((console, payload)) = stdout.rsplit_once(RESULT_SENTINEL) else {
        tracing::error!("Sentinel missing from harness output");
        return ExecutionResult::failure(ErrorType::Internal, JUDGE_FAILED_MSG);
    };
    let console = console.trim();

    match serde_json::from_str::<Envelope>(payload.trim()) {
        Ok(envelope) => ExecutionResult {
            outputs: envelope.results,
            runtimes: envelope.runtimes,
            memory: envelope.peak_memory,
            stdout: console.to_string(),
            error: None,
            error_type: None,
        },
        Err(e) => {
            tracing::error!("Unparsable harness payload: {}", e);
            ExecutionResult::failure(ErrorType::Internal, format!("Failed to parse results: {}", e))
                .with_stdout(console)
        }
    }
}

/// Decodes `console ++ SENTINEL ++ (RES:/TIME:/ERR: lines)*`.
///
/// A compiled driver prints the sentinel before the first call, so anything the
/// solution prints while running is interleaved with the tagged lines and ignored.
pub fn decode_tagged(stdout: &str) -> ExecutionResult {
    let Some((console, stream)) = stdout.split_once(RESULT_SENTINEL) else {
        tracing::error!("Sentinel missing from driver output");
        return ExecutionResult::failure(ErrorType::Internal, JUDGE_FAILED_MSG);
    };
    let console = console.trim();

    let mut outputs = Vec::new();
    let mut runtimes = Vec::new();
    for line in stream.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(text) = line.strip_prefix(RESULT_TAG) {
            outputs.push(coerce_result_text(text.trim()));
        } else if let Some(text) = line.strip_prefix(TIME_TAG) {
            runtimes.push(text.trim().parse::<f64>().unwrap_or(0.0));
        } else if let Some(text) = line.strip_prefix(ERROR_TAG) {
            return ExecutionResult::failure(ErrorType::Runtime, text.trim()).with_stdout(console);
        }
    }

    ExecutionResult {
        outputs,
        runtimes,
        memory: 0.0,
        stdout: console.to_string(),
        error: None,
        error_type: None,
    }
}

/// Turns the text after `RES:` back into a structured value where it is
/// recognisably one; everything else stays a string.
pub fn coerce_result_text(text: &str) -> Value {
    match text {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ if text.starts_with('[') && text.ends_with(']') => {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        }
        _ => Value::String(text.to_string()),
    }
}

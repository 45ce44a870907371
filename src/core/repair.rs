use serde_json::Value;

use crate::core::domain::{Parameter, TestCase};

fn is_collection(declared: &str) -> bool {
    let declared = declared.to_ascii_lowercase();
    declared.contains("[]") || declared.contains("list") || declared.contains("array") || declared.contains("vector")
}

fn is_string(declared: &str) -> bool {
    matches!(
        declared.trim().to_ascii_lowercase().as_str(),
        "str" | "string" | "std::string"
    )
}

/// Fixes test cases whose arguments were stored stringified (`"123"` instead of
/// `123`) or wrapped once too often (`[123]` for a scalar parameter).
///
/// Arguments of parameters declared as strings are never JSON-parsed. A list
/// with more than one element passed to a scalar parameter is left as is.
/// Returns how many test cases changed.
pub fn repair_inputs(parameters: &[Parameter], testcases: &mut [TestCase]) -> usize {
    let mut repaired = 0;

    for tc in testcases.iter_mut() {
        let mut modified = false;

        for (idx, arg) in tc.input.iter_mut().enumerate() {
            let declared = parameters.get(idx).map(|p| p.declared_type.as_str());

            if let Value::String(text) = &*arg {
                if !declared.is_some_and(is_string) {
                    if let Ok(parsed) = serde_json::from_str::<Value>(text.trim()) {
                        *arg = parsed;
                        modified = true;
                    }
                }
            }

            let scalar = declared.is_some_and(|d| !is_collection(d));
            if scalar {
                if let Value::Array(items) = arg {
                    if items.len() == 1 {
                        let inner = items.remove(0);
                        *arg = inner;
                        modified = true;
                    }
                }
            }
        }

        if modified {
            tracing::info!(order = tc.order, input = ?tc.input, "Repaired test case input");
            repaired += 1;
        }
    }

    repaired
}

use itertools::Itertools;
use serde_json::Value;

use crate::constants::RESULT_SENTINEL;
use crate::core::domain::JudgeJob;

/// Appends the judging epilogue to the submission.
///
/// Exceptions raised by a single call are caught and recorded as that call's
/// result. Anything escaping the loop (`SystemExit`, interpreter crashes) ends the
/// process and fails the whole batch.
pub fn generate(job: &JudgeJob) -> String {
    let cases = job
        .testcases
        .iter()
        .map(|tc| format!("    {},", literal(&Value::Array(tc.input.clone()))))
        .join("\n");
    let function = &job.function_name;

    format!(
        r#"{code}


import json as __judge_json
import math as __judge_math
import time as __judge_time
import tracemalloc as __judge_tracemalloc


def __judge_portable(value):
    if isinstance(value, float) and not __judge_math.isfinite(value):
        return str(value)
    if isinstance(value, (list, tuple)):
        return [__judge_portable(item) for item in value]
    if isinstance(value, dict):
        return {{key: __judge_portable(item) for key, item in value.items()}}
    return value


__judge_tracemalloc.start()

__judge_results = []
__judge_runtimes = []
__judge_cases = [
{cases}
]

for __judge_args in __judge_cases:
    __judge_start = __judge_time.perf_counter()
    try:
        if isinstance(__judge_args, list):
            __judge_res = {function}(*__judge_args)
        else:
            __judge_res = {function}(__judge_args)
    except Exception as __judge_err:
        __judge_res = str(__judge_err)
    __judge_end = __judge_time.perf_counter()

    __judge_results.append(__judge_portable(__judge_res))
    __judge_runtimes.append((__judge_end - __judge_start) * 1000)

__judge_current, __judge_peak = __judge_tracemalloc.get_traced_memory()
__judge_tracemalloc.stop()

print('{sentinel}')
print(__judge_json.dumps({{
    "results": __judge_results,
    "runtimes": __judge_runtimes,
    "peak_memory": __judge_peak / 1024 / 1024,
}}, default=str, allow_nan=False))
"#,
        code = job.code,
        cases = cases,
        function = function,
        sentinel = RESULT_SENTINEL,
    )
}

/// Python literal syntax for a JSON value.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        // JSON string escapes are valid Python escapes
        Value::String(s) => Value::String(s.clone()).to_string(),
        Value::Array(items) => format!("[{}]", items.iter().map(literal).join(", ")),
        Value::Object(map) => format!(
            "{{{}}}",
            map.iter()
                .map(|(k, v)| format!("{}: {}", Value::String(k.clone()), literal(v)))
                .join(", ")
        ),
    }
}

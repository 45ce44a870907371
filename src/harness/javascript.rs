use serde_json::Value;

use crate::constants::RESULT_SENTINEL;
use crate::core::domain::JudgeJob;

/// Appends the judging epilogue to the submission. JSON is valid JavaScript, so
/// the argument tuples are embedded as-is. The driver runs inside an IIFE and
/// every binding it introduces is `__judge_` prefixed, so any function name the
/// submission picks stays reachable from inside the loop.
pub fn generate(job: &JudgeJob) -> String {
    let cases = Value::Array(
        job.testcases
            .iter()
            .map(|tc| Value::Array(tc.input.clone()))
            .collect(),
    );

    format!(
        r#"{code}

;(() => {{
    const {{ process: __judge_process, performance: __judge_performance }} = globalThis;
    const __judge_cases = {cases};
    const __judge_results = [];
    const __judge_runtimes = [];

    for (const __judge_args of __judge_cases) {{
        const __judge_start = __judge_performance.now();
        try {{
            const __judge_res = Array.isArray(__judge_args)
                ? {function}(...__judge_args)
                : {function}(__judge_args);
            __judge_results.push(__judge_res);
        }} catch (__judge_err) {{
            __judge_results.push(
                __judge_err && __judge_err.message !== undefined ? __judge_err.message : String(__judge_err)
            );
        }}
        const __judge_end = __judge_performance.now();
        __judge_runtimes.push(__judge_end - __judge_start);
    }}

    __judge_process.stdout.write("\n{sentinel}\n");
    __judge_process.stdout.write(JSON.stringify({{
        results: __judge_results,
        runtimes: __judge_runtimes,
        peak_memory: __judge_process.memoryUsage().heapUsed / 1024 / 1024,
    }}));
}})();
"#,
        code = job.code,
        cases = cases,
        function = job.function_name,
        sentinel = RESULT_SENTINEL,
    )
}

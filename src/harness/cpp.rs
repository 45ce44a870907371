use itertools::Itertools;

use crate::constants::{RESULT_SENTINEL, RESULT_TAG, TIME_TAG};
use crate::core::domain::{JudgeJob, TestCase};
use crate::harness::literal::{LiteralTarget, ValueType, declare};

pub const SOLUTION_FILE: &str = "solution.hpp";
pub const DRIVER_FILE: &str = "main.cpp";
pub const BINARY_FILE: &str = "solution";

const PRELUDE: &str = r#"#pragma once

#include <algorithm>
#include <climits>
#include <cmath>
#include <iostream>
#include <map>
#include <queue>
#include <set>
#include <stack>
#include <string>
#include <unordered_map>
#include <unordered_set>
#include <utility>
#include <vector>

using namespace std;
"#;

const PRINTERS: &str = r#"template <typename T>
void judge_print(const T& v) { std::cout << v; }
void judge_print(bool v) { std::cout << (v ? "true" : "false"); }
void judge_print(const std::string& v) { std::cout << v; }

template <typename R>
void judge_print_real(R v, int min_digits, int max_digits) {
    char buf[64];
    for (int digits = min_digits; digits <= max_digits; ++digits) {
        std::snprintf(buf, sizeof buf, "%.*g", digits, static_cast<double>(v));
        if (static_cast<R>(std::strtod(buf, nullptr)) == v) break;
    }
    std::string text(buf);
    if (text.find_first_of(".eEn") == std::string::npos) text += ".0";
    std::cout << text;
}
void judge_print(double v) { judge_print_real(v, 15, 17); }
void judge_print(float v) { judge_print_real(v, 6, 9); }

template <typename T>
void judge_print(const std::vector<T>& v);

template <typename T>
void judge_print_elem(const T& v) { judge_print(v); }
void judge_print_elem(const std::string& v) {
    std::cout << '"';
    for (char c : v) {
        if (c == '"' || c == '\\') std::cout << '\\';
        std::cout << c;
    }
    std::cout << '"';
}

template <typename T>
void judge_print(const std::vector<T>& v) {
    std::cout << "[";
    for (size_t i = 0; i < v.size(); ++i) {
        if (i > 0) std::cout << ",";
        judge_print_elem(v[i]);
    }
    std::cout << "]";
}
"#;

/// The submission as it is written to `solution.hpp`.
pub fn solution_source(job: &JudgeJob) -> String {
    format!("{}\n{}\n", PRELUDE, job.code)
}

/// `main.cpp`: includes the submission and calls `Solution` once per test case.
/// There is no per-call catch; an uncaught exception terminates the binary.
pub fn generate_driver(job: &JudgeJob) -> String {
    let blocks = job
        .testcases
        .iter()
        .map(|tc| case_block(job, tc))
        .join("\n");

    format!(
        r#"#include "{solution}"

#include <chrono>
#include <cstdio>
#include <cstdlib>
#include <iostream>
#include <string>
#include <vector>

{printers}
int main() {{
    Solution sol;
    std::cout << "{sentinel}" << std::endl;
{blocks}
    return 0;
}}
"#,
        solution = SOLUTION_FILE,
        printers = PRINTERS,
        sentinel = RESULT_SENTINEL,
        blocks = blocks,
    )
}

fn case_block(job: &JudgeJob, tc: &TestCase) -> String {
    let declarations = tc
        .input
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let hint = job.parameter_type(idx).and_then(ValueType::from_declared);
            format!(
                "        {}",
                declare(&format!("arg{}", idx), value, hint.as_ref(), LiteralTarget::Cpp)
            )
        })
        .join("\n");
    let call_args = (0..tc.input.len()).map(|idx| format!("arg{}", idx)).join(", ");

    format!(
        r#"    {{
{declarations}
        auto start = std::chrono::high_resolution_clock::now();
        auto res = sol.{function}({call_args});
        auto end = std::chrono::high_resolution_clock::now();
        std::cout << std::endl << "{res}";
        judge_print(res);
        std::cout << std::endl;
        std::cout << "{time}" << std::chrono::duration<double, std::milli>(end - start).count() << std::endl;
    }}"#,
        declarations = declarations,
        function = job.function_name,
        call_args = call_args,
        res = RESULT_TAG,
        time = TIME_TAG,
    )
}

use std::process::Stdio;
use std::time::Duration;

use serde_json::{Value, json};
use tempfile::TempDir;

use crate::config::EngineConfig;
use crate::core::domain::{ErrorType, JudgeReport, JudgeRequest, OverallStatus, Parameter, TestCase};
use crate::core::pipeline::judging::Judge;

async fn available(program: &str, flag: &str) -> bool {
    tokio::process::Command::new(program)
        .arg(flag)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

fn config(scratch: &TempDir, run_timeout: Duration) -> EngineConfig {
    EngineConfig {
        run_timeout,
        scratch_dir: scratch.path().join("scratch"),
        ..Default::default()
    }
}

fn request(language: &str, code: &str, function_name: &str, cases: Vec<(Vec<Value>, Value)>) -> JudgeRequest {
    JudgeRequest {
        language: language.to_string(),
        code: code.to_string(),
        function_name: function_name.to_string(),
        parameters: vec![],
        testcases: cases
            .into_iter()
            .map(|(input, expected)| TestCase::new(input, expected))
            .collect(),
    }
}

async fn judge(scratch: &TempDir, run_timeout: Duration, request: &JudgeRequest) -> JudgeReport {
    let report = Judge::from_config(&config(scratch, run_timeout))
        .judge(request)
        .await
        .expect("Judging should not be rejected");

    let leftovers = std::fs::read_dir(scratch.path().join("scratch"))
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftovers, 0, "Scratch space was not cleaned up");

    report
}

const PYTHON_ADD: &str = "def add(a, b):\n    return a + b\n";

#[tokio::test]
async fn test_python_accepted() {
    if !available("python3", "--version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let request = request(
        "python",
        PYTHON_ADD,
        "add",
        vec![(vec![json!(2), json!(3)], json!(5)), (vec![json!(10), json!(-4)], json!("6"))],
    );

    let report = judge(&scratch, Duration::from_secs(10), &request).await;

    assert_eq!(report.status, OverallStatus::Accepted);
    assert_eq!(report.execution.outputs.len(), 2);
    assert_eq!(report.execution.runtimes.len(), 2);
    assert_eq!(report.error, "");
}

#[tokio::test]
async fn test_python_console_output_is_kept() {
    if !available("python3", "--version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let code = "def add(a, b):\n    print('adding', a, b)\n    return a + b\n";
    let request = request("python", code, "add", vec![(vec![json!(1), json!(1)], json!(2))]);

    let report = judge(&scratch, Duration::from_secs(10), &request).await;

    assert_eq!(report.status, OverallStatus::Accepted);
    assert_eq!(report.console_output, "adding 1 1");
}

#[tokio::test]
async fn test_python_system_exit_is_runtime_error() {
    if !available("python3", "--version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let code = "def add(a, b):\n    raise SystemExit('fatal')\n";
    let request = request("python", code, "add", vec![(vec![json!(1), json!(2)], json!(3))]);

    let report = judge(&scratch, Duration::from_secs(10), &request).await;

    assert_eq!(report.error_type, Some(ErrorType::Runtime));
    assert!(report.error.contains("fatal"));
    assert!(report.execution.outputs.is_empty());
    assert_eq!(report.passed, 0);
}

#[tokio::test]
async fn test_python_infinite_loop_times_out() {
    if !available("python3", "--version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let code = "def add(a, b):\n    while True:\n        pass\n";
    let request = request("python", code, "add", vec![(vec![json!(1), json!(2)], json!(3))]);

    let report = judge(&scratch, Duration::from_millis(500), &request).await;

    assert_eq!(report.error_type, Some(ErrorType::Timeout));
    assert!(report.execution.outputs.is_empty());
    assert_eq!(report.status, OverallStatus::WrongAnswer);
}

#[tokio::test]
async fn test_javascript_accepted() {
    if !available("node", "--version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let code = "function reverse(items) { return [...items].reverse(); }";
    let request = request(
        "JavaScript",
        code,
        "reverse",
        vec![(vec![json!([1, 2, 3])], json!([3, 2, 1])), (vec![json!([])], json!("[]"))],
    );

    let report = judge(&scratch, Duration::from_secs(10), &request).await;

    assert_eq!(report.status, OverallStatus::Accepted);
    assert_eq!(report.passed, 2);
}

#[tokio::test]
async fn test_cpp_accepted() {
    if !available("g++", "--version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let code = r#"
class Solution {
public:
    vector<int> twoSum(vector<int>& nums, int target) {
        for (size_t i = 0; i < nums.size(); ++i)
            for (size_t j = i + 1; j < nums.size(); ++j)
                if (nums[i] + nums[j] == target) return {(int)i, (int)j};
        return {};
    }
};
"#;
    let mut request = request(
        "cpp",
        code,
        "twoSum",
        vec![
            (vec![json!([2, 7, 11, 15]), json!(9)], json!([0, 1])),
            (vec![json!([]), json!(0)], json!([])),
        ],
    );
    request.parameters = vec![Parameter::new("nums", "vector<int>"), Parameter::new("target", "int")];

    let report = judge(&scratch, Duration::from_secs(10), &request).await;

    assert_eq!(report.status, OverallStatus::Accepted);
    assert_eq!(report.execution.memory, 0.0);
}

#[tokio::test]
async fn test_cpp_missing_symbol_is_compilation_error() {
    if !available("g++", "--version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let code = "class Solution { public: int other(int a) { return a; } };";
    let request = request("cpp", code, "add", vec![(vec![json!(1), json!(2)], json!(3))]);

    let report = judge(&scratch, Duration::from_secs(10), &request).await;

    assert_eq!(report.error_type, Some(ErrorType::Compilation));
    assert!(report.error.starts_with("Compilation Error:\n"));
    assert!(report.verdicts.iter().all(|v| !v.passed));
}

#[tokio::test]
async fn test_cpp_throw_aborts_the_batch() {
    if !available("g++", "--version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let code = "class Solution { public: int half(int n) { if (n % 2) throw 42; return n / 2; } };";
    let request = request(
        "cpp",
        code,
        "half",
        vec![(vec![json!(4)], json!(2)), (vec![json!(3)], json!(1))],
    );

    let report = judge(&scratch, Duration::from_secs(10), &request).await;

    assert_eq!(report.error_type, Some(ErrorType::Runtime));
    assert!(report.execution.outputs.is_empty());
    assert!(report.verdicts.iter().all(|v| v.error_type == Some(ErrorType::Runtime)));
}

#[tokio::test]
async fn test_java_accepted() {
    if !available("javac", "-version").await || !available("java", "-version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let code = r#"
class Solution {
    public int[] twoSum(int[] nums, int target) {
        Map<Integer, Integer> seen = new HashMap<>();
        for (int i = 0; i < nums.length; i++) {
            Integer j = seen.get(target - nums[i]);
            if (j != null) return new int[]{j, i};
            seen.put(nums[i], i);
        }
        return new int[]{};
    }
}
"#;
    let mut request = request(
        "java",
        code,
        "twoSum",
        vec![
            (vec![json!([3, 2, 4]), json!(6)], json!([1, 2])),
            (vec![json!([]), json!(1)], json!([])),
        ],
    );
    request.parameters = vec![Parameter::new("nums", "int[]"), Parameter::new("target", "int")];

    let report = judge(&scratch, Duration::from_secs(20), &request).await;

    assert_eq!(report.status, OverallStatus::Accepted);
    assert_eq!(report.passed, 2);
}

#[tokio::test]
async fn test_python_raised_error_is_that_case_result() {
    if !available("python3", "--version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let code = "def half(n):\n    if n % 2:\n        raise ValueError('bad')\n    return n // 2\n";
    let request = request(
        "python",
        code,
        "half",
        vec![(vec![json!(3)], json!(1)), (vec![json!(4)], json!(2))],
    );

    let report = judge(&scratch, Duration::from_secs(10), &request).await;

    assert_eq!(report.execution.outputs, vec![json!("bad"), json!(2)]);
    assert_eq!(report.execution.error, None);
    assert_eq!(report.error_type, None);
    assert_eq!(report.error, "");
    assert!(!report.verdicts[0].passed);
    assert!(report.verdicts[1].passed);
    assert_eq!(report.passed, 1);
}

#[tokio::test]
async fn test_python_non_finite_float_result() {
    if !available("python3", "--version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let code = "def ratio(a, b):\n    return a / b if b else float('inf')\n";
    let request = request(
        "python",
        code,
        "ratio",
        vec![(vec![json!(1), json!(0)], json!("inf")), (vec![json!(3), json!(2)], json!(1.5))],
    );

    let report = judge(&scratch, Duration::from_secs(10), &request).await;

    assert_eq!(report.error_type, None);
    assert_eq!(report.status, OverallStatus::Accepted);
}

#[tokio::test]
async fn test_javascript_thrown_error_is_that_case_result() {
    if !available("node", "--version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let code = "function half(n) { if (n % 2) throw new Error('bad'); return n / 2; }";
    let request = request(
        "javascript",
        code,
        "half",
        vec![(vec![json!(3)], json!(1)), (vec![json!(4)], json!(2))],
    );

    let report = judge(&scratch, Duration::from_secs(10), &request).await;

    assert_eq!(report.execution.outputs, vec![json!("bad"), json!(2)]);
    assert_eq!(report.execution.error, None);
    assert_eq!(report.error, "");
    assert!(!report.verdicts[0].passed);
    assert!(report.verdicts[1].passed);
    assert_eq!(report.passed, 1);
}

#[tokio::test]
async fn test_javascript_function_named_like_driver_locals() {
    if !available("node", "--version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    for name in ["start", "end", "args", "res", "process"] {
        let code = format!("function {}(a, b) {{ return a + b; }}", name);
        let request = request("javascript", &code, name, vec![(vec![json!(2), json!(3)], json!(5))]);

        let report = judge(&scratch, Duration::from_secs(10), &request).await;

        assert_eq!(report.status, OverallStatus::Accepted, "function named `{}`", name);
    }
}

#[tokio::test]
async fn test_cpp_unterminated_debug_output_keeps_alignment() {
    if !available("g++", "--version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let code = r#"
class Solution {
public:
    int sq(int n) {
        if (n == 2) cout << "dbg";
        return n * n;
    }
};
"#;
    let request = request(
        "cpp",
        code,
        "sq",
        vec![(vec![json!(2)], json!(4)), (vec![json!(3)], json!(9))],
    );

    let report = judge(&scratch, Duration::from_secs(10), &request).await;

    assert_eq!(report.execution.outputs, vec![json!("4"), json!("9")]);
    assert_eq!(report.execution.runtimes.len(), 2);
    assert_eq!(report.status, OverallStatus::Accepted);
}

#[tokio::test]
async fn test_cpp_double_results_keep_precision() {
    if !available("g++", "--version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let code = r#"
class Solution {
public:
    double scale(int n) { return n == 0 ? 3.14159265 : n * 0.5; }
};
"#;
    let request = request(
        "cpp",
        code,
        "scale",
        vec![
            (vec![json!(0)], json!(3.14159265)),
            (vec![json!(4)], json!(2.0)),
            (vec![json!(1)], json!(0.5)),
        ],
    );

    let report = judge(&scratch, Duration::from_secs(10), &request).await;

    assert_eq!(report.execution.outputs[0], json!("3.14159265"));
    assert_eq!(report.status, OverallStatus::Accepted);
}

#[tokio::test]
async fn test_java_unterminated_debug_output_keeps_alignment() {
    if !available("javac", "-version").await || !available("java", "-version").await {
        return;
    }
    let scratch = TempDir::new().unwrap();
    let code = r#"
class Solution {
    public int sq(int n) {
        if (n == 2) System.out.print("dbg");
        return n * n;
    }
}
"#;
    let request = request(
        "java",
        code,
        "sq",
        vec![(vec![json!(2)], json!(4)), (vec![json!(3)], json!(9))],
    );

    let report = judge(&scratch, Duration::from_secs(20), &request).await;

    assert_eq!(report.execution.outputs, vec![json!("4"), json!("9")]);
    assert_eq!(report.status, OverallStatus::Accepted);
}

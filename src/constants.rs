/// Separates console output of the submission from the machine-readable payload.
pub const RESULT_SENTINEL: &str = "---RESULT_JSON_START---";

pub const RESULT_TAG: &str = "RES:";
pub const TIME_TAG: &str = "TIME:";
pub const ERROR_TAG: &str = "ERR:";

pub const DEFAULT_RUN_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_COMPILE_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_CONCURRENT_JUDGINGS: usize = 4;

pub const JUDGE_FAILED_MSG: &str = "Judge failed to produce output";
pub const EXECUTION_TIMED_OUT_MSG: &str = "Execution timed out";
pub const COMPILATION_TIMED_OUT_MSG: &str = "Compilation timed out";

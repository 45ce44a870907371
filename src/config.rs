use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_COMPILE_TIMEOUT_MS, DEFAULT_MAX_CONCURRENT_JUDGINGS, DEFAULT_RUN_TIMEOUT_MS,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: expected {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Executables used by the runners. Bare names are resolved through `PATH`.
#[derive(Clone, Debug, PartialEq)]
pub struct Toolchain {
    pub python: PathBuf,
    pub node: PathBuf,
    pub gnucpp: PathBuf,
    pub javac: PathBuf,
    pub java: PathBuf,
}

impl Default for Toolchain {
    fn default() -> Self {
        Toolchain {
            python: "python3".into(),
            node: "node".into(),
            gnucpp: "g++".into(),
            javac: "javac".into(),
            java: "java".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub run_timeout: Duration,
    pub compile_timeout: Duration,
    pub max_concurrent_judgings: usize,
    /// How long a judging call may wait for a free slot. `None` waits forever.
    pub queue_timeout: Option<Duration>,
    pub scratch_dir: PathBuf,
    pub toolchain: Toolchain,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            run_timeout: Duration::from_millis(DEFAULT_RUN_TIMEOUT_MS),
            compile_timeout: Duration::from_millis(DEFAULT_COMPILE_TIMEOUT_MS),
            max_concurrent_judgings: DEFAULT_MAX_CONCURRENT_JUDGINGS,
            queue_timeout: None,
            scratch_dir: std::env::temp_dir().join("polyjudge"),
            toolchain: Toolchain::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from a key lookup, falling back to defaults for
    /// missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();
        let path = |key: &str, default: PathBuf| lookup(key).map(PathBuf::from).unwrap_or(default);

        let max_concurrent_judgings = match lookup("JUDGE_MAX_CONCURRENT") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "JUDGE_MAX_CONCURRENT",
                        value: raw,
                        expected: "a positive integer",
                    });
                }
            },
            None => defaults.max_concurrent_judgings,
        };

        Ok(EngineConfig {
            run_timeout: millis(&lookup, "JUDGE_RUN_TIMEOUT_MS")?.unwrap_or(defaults.run_timeout),
            compile_timeout: millis(&lookup, "JUDGE_COMPILE_TIMEOUT_MS")?
                .unwrap_or(defaults.compile_timeout),
            max_concurrent_judgings,
            queue_timeout: millis(&lookup, "JUDGE_QUEUE_TIMEOUT_MS")?,
            scratch_dir: path("JUDGE_SCRATCH_DIR", defaults.scratch_dir),
            toolchain: Toolchain {
                python: path("JUDGE_PYTHON_PATH", defaults.toolchain.python),
                node: path("JUDGE_NODE_PATH", defaults.toolchain.node),
                gnucpp: path("GNUCPP_PATH", defaults.toolchain.gnucpp),
                javac: path("JUDGE_JAVAC_PATH", defaults.toolchain.javac),
                java: path("JUDGE_JAVA_PATH", defaults.toolchain.java),
            },
        })
    }
}

fn millis<F>(lookup: &F, key: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidValue {
                    key,
                    value: raw,
                    expected: "a number of milliseconds",
                })
        })
        .transpose()
}

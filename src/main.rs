use std::io::Read;
use std::panic;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::core::domain::JudgeRequest;
use crate::core::pipeline::judging::Judge;
use crate::core::repair::repair_inputs;

mod config;
mod constants;
mod core;
mod harness;
mod native;
mod runners;

#[cfg(test)]
mod integration_test;

/// Judges a submission against its test cases and prints the report as JSON.
#[derive(Parser, Debug)]
#[command(name = "polyjudge", version)]
struct Cli {
    /// File with the judge request. Reads stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Parse stringified arguments and unwrap single-element lists before judging
    #[arg(long)]
    repair_inputs: bool,

    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    set_panic_hook();

    let cli = Cli::parse();
    let config = EngineConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    let raw = match &cli.input {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let mut request: JudgeRequest = serde_json::from_str(&raw)?;

    if cli.repair_inputs {
        let repaired = repair_inputs(&request.parameters, &mut request.testcases);
        tracing::info!("Repaired {} test cases", repaired);
    }

    let judge = Judge::from_config(&config);
    let report = judge.judge(&request).await?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);

    Ok(())
}

fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}

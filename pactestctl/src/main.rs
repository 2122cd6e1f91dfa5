use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Parser, Subcommand};
use pactestctl::{RunOptions, runner};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "pactestctl")]
#[command(about = "Operator tooling for the PAC test server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay CSV-defined PAC test cases against a running server
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Directory searched recursively for *.test.csv files
    #[arg(long, default_value = "tests/")]
    tests: PathBuf,

    /// Directory holding the PAC files referenced by the cases
    #[arg(long, default_value = "pacs/")]
    pacs: PathBuf,

    /// Base URL of the PAC test server
    #[arg(long, env = "PACTEST_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    server: Url,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Command::Run(args) => {
            let options = RunOptions {
                tests_dir: args.tests,
                pacs_dir: args.pacs,
                server: args.server,
            };
            let summary = runner::run(&options)
                .await
                .context("test run aborted")?;
            Ok(ExitCode::from(summary.exit_code()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["pactestctl", "run"]).unwrap();
        let Command::Run(args) = cli.command;
        assert_eq!(args.tests, PathBuf::from("tests/"));
        assert_eq!(args.pacs, PathBuf::from("pacs/"));
        assert_eq!(args.server.as_str(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn rejects_bad_server_url() {
        assert!(Cli::try_parse_from(["pactestctl", "run", "--server", "not a url"]).is_err());
    }
}

//! Ship standard input to LogDNA, one log line per input line.
use anyhow::Context;
use clap::Parser;
use jiff::Timestamp;
use logdna::{Client, ClientBuilder, Config, DEFAULT_FLUSH_LIMIT};
use std::{
    io::{self, BufRead},
    process::ExitCode,
};
use tracing_subscriber::EnvFilter;

/// Read lines from standard input and send them to LogDNA.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// LogDNA ingestion key.
    #[arg(long, env = "LOGDNA_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Hostname you want logs to appear from in the LogDNA viewer.
    ///
    /// Defaults to the hostname of this machine.
    #[arg(long)]
    hostname: Option<String>,

    /// Log file or app name you want logs to appear as in the LogDNA viewer.
    #[arg(long)]
    app_name: Option<String>,

    /// Number of buffered lines that triggers a flush.
    #[arg(long, default_value_t = DEFAULT_FLUSH_LIMIT)]
    flush_limit: usize,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            api_key: args.api_key,
            hostname: args.hostname,
            file: args.app_name,
            flush_limit: args.flush_limit,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    let client = ClientBuilder::from(Config::from(args))
        .build()
        .context("failed to create client")?;

    match ship(&client, io::stdin().lock()) {
        Ok(lines) => {
            tracing::debug!(lines, "end of input");
            client.close().context("failed to flush logs")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(err = %e, "error reading from stdin");
            if let Err(e) = client.close() {
                tracing::error!(err = %e, "failed to flush logs");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Log every line of `input`, returning how many were read.
///
/// Lines read before an error stay buffered in `client`.
fn ship(client: &Client, input: impl BufRead) -> io::Result<usize> {
    let mut lines = 0;
    for line in input.lines() {
        client.log(Timestamp::now(), line?);
        lines += 1;
    }
    Ok(lines)
}

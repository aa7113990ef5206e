//! Terminal host: submits a debate for analysis and follows its progress.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use adjudicator_client::{
    ClientSettings, ConnectionController, DurableStore, FileStore, JobParameters, MemoryStore,
    ReqwestTransport,
};
use adjudicator_core::{CreditGate, Outcome};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use client_logging::{client_info, LogDestination};
use log::LevelFilter;

mod config;
mod render;

use config::ClientConfig;
use render::TerminalSink;

#[derive(Debug, Parser)]
#[command(
    name = "adjudicator",
    version,
    about = "Submit a debate for analysis and follow its progress"
)]
struct Cli {
    /// File holding the debate transcript.
    #[arg(long, value_name = "FILE")]
    text_file: PathBuf,

    /// Server base URL.
    #[arg(long)]
    server: Option<String>,

    /// Extra form field.
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    fields: Vec<(String, String)>,

    /// Attach a file as a form field.
    #[arg(long = "attach", value_name = "FIELD=PATH", value_parser = parse_key_value)]
    attachments: Vec<(String, String)>,

    #[arg(long, requires = "credits_minimum")]
    credits_available: Option<u32>,

    #[arg(long, requires = "credits_available")]
    credits_minimum: Option<u32>,

    /// Directory for the durable client storage.
    #[arg(long, value_name = "DIR")]
    storage_dir: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    log: LogTarget,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogTarget {
    Terminal,
    File,
    Both,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let destination = match cli.log {
        LogTarget::Terminal => LogDestination::Terminal,
        LogTarget::File => LogDestination::default_file(),
        LogTarget::Both => LogDestination::Both(client_logging::DEFAULT_LOG_FILE.into()),
    };
    client_logging::initialize(destination, level);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = ClientConfig::load(cli.config.as_deref())?;
    let mut settings = ClientSettings::default();
    config.apply(&mut settings);
    if let Some(server) = &cli.server {
        settings.base_url = server.clone();
    }

    let params = build_parameters(&cli)?;
    let gate = match (cli.credits_available, cli.credits_minimum) {
        (Some(available), Some(minimum)) => Some(CreditGate::new(available, minimum)),
        _ => config.credits.as_ref().map(|credits| credits.gate()),
    };

    let store: Arc<dyn DurableStore> = match cli.storage_dir.or(config.storage_dir) {
        Some(dir) => Arc::new(FileStore::new(dir)),
        None => Arc::new(MemoryStore::new()),
    };
    let transport = ReqwestTransport::new(settings).context("configuring transport")?;
    let sink = Arc::new(TerminalSink::new(transport.endpoint().clone()));
    let mut controller = ConnectionController::new(transport, store, sink);

    if let Err(err) = controller.submit(&params, gate.as_ref()).await {
        eprintln!("Submission rejected: {err}");
        return Ok(ExitCode::from(2));
    }
    controller.run().await;

    let outcome = controller.state().outcome().clone();
    match outcome {
        Outcome::Success { .. } => {
            controller.wait_for_redirect().await;
            client_info!("Analysis finished");
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Failure { reason } => {
            eprintln!("Analysis failed: {reason}");
            Ok(ExitCode::from(1))
        }
        Outcome::None => Ok(ExitCode::from(1)),
    }
}

fn build_parameters(cli: &Cli) -> anyhow::Result<JobParameters> {
    let text = fs::read_to_string(&cli.text_file)
        .with_context(|| format!("reading debate text from {}", cli.text_file.display()))?;

    let mut params = JobParameters::debate_text(text);
    for (name, value) in &cli.fields {
        params = params.text(name.clone(), value.clone());
    }
    for (field, path) in &cli.attachments {
        let path = Path::new(path);
        let bytes =
            fs::read(path).with_context(|| format!("reading attachment {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| field.clone());
        params = params.file(field.clone(), file_name, bytes);
    }
    Ok(params)
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chatlate_config::Config;
use chatlate_config::pipeline::IterationMode;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod controller;
mod profile;
mod report;
mod setup;
mod status;


use self::controller::{LoopController, LoopSettings};
use self::profile::ProfileStore;

/// Watches a game chat region, recognizes its text and translates new lines
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Profile name under the user config directory
    #[arg(long, default_value = "main")]
    profile: String,

    /// Read this config file instead of a profile
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single iteration and exit
    #[arg(long)]
    once: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.json_logs);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e:#}");
            return ExitCode::from(2);
        }
    };

    let startup = match build_controller(&config).await {
        Ok(startup) => startup,
        Err(e) => {
            tracing::error!("Startup failed: {e:#}");
            return ExitCode::from(2);
        }
    };

    run(startup).await
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.with_ansi(atty::is(atty::Stream::Stderr)).init();
    }
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => profile::load_config_file(path)?,
        None => {
            let store = ProfileStore::user()?;
            store.init()?;
            store.load(&args.profile)?
        }
    };

    config.apply_env_overrides();
    if args.once {
        config.pipeline.mode = IterationMode::Once;
    }

    // Fail before the first capture rather than on every iteration
    config.validate()?;
    Ok(config)
}

struct Startup {
    controller: LoopController,
    report_rx: kanal::AsyncReceiver<chatlate_types::PipelineEvent>,
}

async fn build_controller(config: &Config) -> anyhow::Result<Startup> {
    let capture = setup::build_capture(&config.capture);
    let recognizer = setup::build_recognizer(&config.ocr);
    let version = recognizer.probe(&config.ocr.language).await?;
    let translator = setup::build_translator(&config.translator)?;

    tracing::info!(
        "Capturing {} region {} at {}, OCR {} [{}], translator {}",
        capture.describe(),
        config.capture.roi,
        config.capture.reference_resolution,
        version,
        config.ocr.language,
        translator
            .as_ref()
            .map(|t| t.metadata().name)
            .unwrap_or_else(|| "disabled".to_string())
    );

    let (report_tx, report_rx) = kanal::bounded_async(64);
    let controller = LoopController::new(
        capture,
        Box::new(recognizer),
        translator,
        LoopSettings::from_config(config),
        report_tx,
    );

    Ok(Startup {
        controller,
        report_rx,
    })
}

async fn run(startup: Startup) -> ExitCode {
    let Startup {
        mut controller,
        report_rx,
    } = startup;

    let reporter = tokio::spawn(report::report_loop(report_rx));

    // Ctrl+C is only observed between iterations
    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    let result = controller.run(cancel).await;
    tracing::debug!("Loop ended in {:?}: {}", controller.phase(), controller.status());
    drop(controller);

    match tokio::time::timeout(Duration::from_secs(5), reporter).await {
        Ok(Ok(Err(e))) => tracing::error!("Reporter failed: {e:#}"),
        Ok(Err(e)) => tracing::error!("Reporter task panicked: {e}"),
        Err(_) => tracing::warn!("Reporter did not finish in time"),
        Ok(Ok(Ok(()))) => {}
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Exiting: {e}");
            ExitCode::FAILURE
        }
    }
}

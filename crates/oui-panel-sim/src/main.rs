//! Replays a scripted AR session through the panel controller and prints one
//! JSON tick report per line.
//!
//! Usage:
//!   panel-sim                          # built-in demo, 200 ticks
//!   panel-sim --scenario trace.json    # replay a recorded trace
//!   panel-sim --config oui-panel.toml --ticks 50 --pretty

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use oui_panel::PanelSession;
use oui_panel_sim::{demo, replay, write_report, Scenario, DEMO_TICKS};
use tracing::info;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "panel-sim",
    about = "Headless replay of the obstruction-aware AR panel",
    version
)]
struct Args {
    /// Config file (otherwise OUI_PANEL_CONFIG, ./oui-panel.toml, then the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scenario JSON to replay instead of the built-in demo
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(long)]
    ticks: Option<usize>,

    /// Frame length in seconds for steps that do not set their own
    #[arg(long, default_value_t = 0.05)]
    dt: f32,

    /// Pretty-print each report
    #[arg(long)]
    pretty: bool,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    ensure!(
        args.dt.is_finite() && args.dt > 0.0,
        "--dt must be a positive number of seconds, got {}",
        args.dt
    );

    let (config, source) =
        oui_panel_config::discover(args.config.as_deref()).context("Failed to load config")?;
    info!("Using config from {}", source);

    let scenario = match &args.scenario {
        Some(path) => {
            let mut scenario = Scenario::load(path)?;
            if let Some(ticks) = args.ticks {
                scenario.truncate(ticks);
            }
            scenario
        }
        None => demo(args.ticks.unwrap_or(DEMO_TICKS)),
    };
    info!("Replaying {} ticks", scenario.steps.len());

    let mut session = PanelSession::new(config.to_session_config(), &scenario.initial_viewer());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    replay(&mut session, &scenario, args.dt, |report| {
        write_report(&mut out, report, args.pretty)
    })?;
    out.flush().context("Failed to flush output")?;

    info!(
        "Finished in state {} after {:.2}s",
        session.state(),
        session.clock().time.as_secs_f32()
    );
    Ok(())
}

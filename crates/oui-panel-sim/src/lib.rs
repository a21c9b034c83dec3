//! Headless replay of panel sessions
//!
//! A [`Scenario`] lists frames: the viewer pose, the raw server messages
//! received and the ray results reported before each tick. [`replay`] feeds
//! them through a [`PanelSession`] and hands every [`TickReport`] to a sink.

pub mod scenario;

pub use scenario::{demo, Scenario, Step, DEMO_TICKS};

use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use oui_panel::{PanelSession, TickReport};
use tracing::{debug, warn};

/// Run every step of `scenario` through `session`.
///
/// Messages the session cannot decode are logged and skipped; an invalid
/// frame length aborts the run.
pub fn replay<F>(
    session: &mut PanelSession,
    scenario: &Scenario,
    default_dt: f32,
    mut emit: F,
) -> Result<()>
where
    F: FnMut(&TickReport) -> Result<()>,
{
    for (index, step) in scenario.steps.iter().enumerate() {
        let seconds = step.dt.unwrap_or(default_dt);
        let dt = Duration::try_from_secs_f32(seconds)
            .map_err(|e| anyhow!("step {index}: invalid dt {seconds}: {e}"))?;

        for raw in &step.messages {
            match session.receive(raw) {
                Ok(spawned) if spawned > 0 => debug!("step {index}: {spawned} new anchors"),
                Ok(_) => {}
                Err(e) => warn!("step {index}: rejected server message: {e}"),
            }
        }
        for (id, hits) in &step.hits {
            session.report_hits(id, hits);
        }

        let report = session.tick(dt, &step.viewer_pose());
        emit(&report)?;
    }
    Ok(())
}

/// Write one report as a JSON line.
pub fn write_report<W: Write>(out: &mut W, report: &TickReport, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, report)
    } else {
        serde_json::to_writer(&mut *out, report)
    }
    .context("Failed to encode tick report")?;
    writeln!(out).context("Failed to write tick report")?;
    Ok(())
}

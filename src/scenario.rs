// src/scenario.rs
//
// Recorded observation frames for offline replay. One frame per control
// tick, each a list of kinematics rows `[presence, x, y, vx, vy, heading]`
// with ego first.

use crate::decision::{BehaviorDecisionMaking, TickOutcome};
use crate::error::Result;
use crate::metrics::DecisionMetrics;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub frames: Vec<Vec<Vec<f64>>>,
}

impl Scenario {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let scenario: Scenario = serde_json::from_str(&contents)?;
        Ok(scenario)
    }

    /// Simulated seconds covered by the recording.
    pub fn duration_s(&self, sampling_time: f64) -> f64 {
        self.frames.len() as f64 * sampling_time
    }
}

/// Run every frame through `module`, one tick each. Stops at the first
/// malformed frame.
pub fn replay(
    scenario: &Scenario,
    module: &mut BehaviorDecisionMaking,
    metrics: &mut DecisionMetrics,
) -> Result<Vec<TickOutcome>> {
    info!(
        "Replaying {} ({} frames, {:.1}s)",
        scenario.name.as_deref().unwrap_or("unnamed scenario"),
        scenario.frames.len(),
        scenario.duration_s(module.config().sampling_time)
    );

    let mut outcomes = Vec::with_capacity(scenario.frames.len());
    for (step, frame) in scenario.frames.iter().enumerate() {
        let outcome = module.tick(frame, step as u64)?;
        metrics.record(&outcome);
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Per-tick decision trace as JSON lines, one `TickOutcome` per line.
pub fn write_trace(outcomes: &[TickOutcome], path: &str) -> anyhow::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for outcome in outcomes {
        serde_json::to_writer(&mut writer, outcome)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

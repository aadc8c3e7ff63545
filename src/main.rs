// src/main.rs

use anyhow::{Context, Result};
use highway_behavior::metrics::DecisionMetrics;
use highway_behavior::scenario::{self, Scenario};
use highway_behavior::{BehaviorDecisionMaking, Config};
use std::fs;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config_path =
        std::env::var("HIGHWAY_BEHAVIOR_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
    let config = Config::load(&config_path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("highway_behavior={}", config.logging.level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚗 Behavior decision replay starting");
    info!("✓ Configuration loaded from {}", config_path);
    info!(
        "Thresholds: headway={:.2}s, safety_ttc={:.2}s, target_speed={:.1}m/s, dt={:.3}s",
        config.decision.target_headway_time,
        config.decision.safety_ttc,
        config.decision.target_speed,
        config.decision.sampling_time
    );

    // A path on the command line wins over the configured one.
    let scenario_path = match std::env::args().nth(1).or(config.replay.scenario_path.clone()) {
        Some(path) => path,
        None => {
            error!("No scenario given: pass a path or set replay.scenario_path");
            return Ok(());
        }
    };
    let scenario =
        Scenario::load(&scenario_path).with_context(|| format!("loading {}", scenario_path))?;

    if scenario.frames.is_empty() {
        warn!("Scenario {} has no frames", scenario_path);
        return Ok(());
    }

    let mut module = BehaviorDecisionMaking::new(config.decision.clone())?;
    let mut metrics = DecisionMetrics::new();
    let outcomes = scenario::replay(&scenario, &mut module, &mut metrics)
        .with_context(|| format!("replaying {}", scenario_path))?;

    let summary = metrics.summary();
    info!("✓ Replay finished");
    info!("  Ticks: {}", summary.ticks);
    info!(
        "  Actions: LANE_LEFT={} IDLE={} LANE_RIGHT={} FASTER={} SLOWER={}",
        summary.lane_left, summary.idle, summary.lane_right, summary.faster, summary.slower
    );
    info!(
        "  Lane changes: {} started, {} completed, {} aborted",
        summary.lane_changes_started, summary.lane_changes_completed, summary.lane_changes_aborted
    );
    if let Some(headway) = summary.min_front_headway_s {
        info!("  Closest headway to leader: {:.2}s", headway);
    }
    info!("  Decision rate: {:.0} ticks/s", summary.ticks_per_sec);

    if let Some(output_path) = &config.replay.output_path {
        let codes: Vec<u8> = outcomes.iter().map(|o| o.action.code()).collect();
        fs::write(output_path, serde_json::to_string(&codes)?)
            .with_context(|| format!("writing {}", output_path))?;
        info!("✓ Action codes written to {}", output_path);
    }

    if let Some(trace_path) = &config.replay.trace_path {
        scenario::write_trace(&outcomes, trace_path)
            .with_context(|| format!("writing {}", trace_path))?;
        info!("✓ Decision trace written to {}", trace_path);
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

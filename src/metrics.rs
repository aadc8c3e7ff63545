// src/metrics.rs
//
// Run statistics for a sequence of decision ticks. Fed one TickOutcome at
// a time by whoever drives the control loop.

use crate::decision::{TickOutcome, TimeGap};
use crate::types::{Action, LaneChangePhase};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct DecisionMetrics {
    ticks: u64,
    actions: HashMap<Action, u64>,
    lane_changes_started: u64,
    lane_changes_completed: u64,
    lane_changes_aborted: u64,
    speed_reduction_ticks: u64,
    min_front_headway_s: Option<f64>,
    started_at: Instant,
}

impl DecisionMetrics {
    pub fn new() -> Self {
        Self {
            ticks: 0,
            actions: HashMap::new(),
            lane_changes_started: 0,
            lane_changes_completed: 0,
            lane_changes_aborted: 0,
            speed_reduction_ticks: 0,
            min_front_headway_s: None,
            started_at: Instant::now(),
        }
    }

    pub fn record(&mut self, outcome: &TickOutcome) {
        self.ticks += 1;
        *self.actions.entry(outcome.action).or_insert(0) += 1;

        if outcome.reduce_speed {
            self.speed_reduction_ticks += 1;
        }

        if let Some(TimeGap::Finite(headway)) = outcome.front_headway {
            self.min_front_headway_s = Some(match self.min_front_headway_s {
                Some(min) => min.min(headway),
                None => headway,
            });
        }

        if let Some(event) = &outcome.lane_change_event {
            match event.phase {
                LaneChangePhase::Started => self.lane_changes_started += 1,
                LaneChangePhase::Completed => self.lane_changes_completed += 1,
                LaneChangePhase::Aborted { .. } => self.lane_changes_aborted += 1,
            }
        }
    }

    pub fn action_count(&self, action: Action) -> u64 {
        self.actions.get(&action).copied().unwrap_or(0)
    }

    /// Decision ticks per wall-clock second.
    pub fn ticks_per_sec(&self) -> f64 {
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            self.ticks as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            ticks: self.ticks,
            lane_left: self.action_count(Action::LaneLeft),
            idle: self.action_count(Action::Idle),
            lane_right: self.action_count(Action::LaneRight),
            faster: self.action_count(Action::Faster),
            slower: self.action_count(Action::Slower),
            lane_changes_started: self.lane_changes_started,
            lane_changes_completed: self.lane_changes_completed,
            lane_changes_aborted: self.lane_changes_aborted,
            speed_reduction_ticks: self.speed_reduction_ticks,
            min_front_headway_s: self.min_front_headway_s,
            ticks_per_sec: self.ticks_per_sec(),
        }
    }
}

impl Default for DecisionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub ticks: u64,
    pub lane_left: u64,
    pub idle: u64,
    pub lane_right: u64,
    pub faster: u64,
    pub slower: u64,
    pub lane_changes_started: u64,
    pub lane_changes_completed: u64,
    pub lane_changes_aborted: u64,
    pub speed_reduction_ticks: u64,
    pub min_front_headway_s: Option<f64>,
    pub ticks_per_sec: f64,
}

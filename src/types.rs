// src/types.rs

use crate::error::{DecisionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub decision: DecisionConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Parameters of one behavior decision module. Fixed for its lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// Seconds per control tick. No default: the caller's loop owns it.
    pub sampling_time: f64,
    #[serde(default = "default_target_headway_time")]
    pub target_headway_time: f64,
    #[serde(default = "default_safety_ttc")]
    pub safety_ttc: f64,
    #[serde(default = "default_lane_width")]
    pub lane_width: f64,
    #[serde(default = "default_vehicle_length")]
    pub vehicle_length: f64,
    /// Cruise speed (m/s). Below `target_speed - speed_tolerance` ego asks for FASTER.
    #[serde(default = "default_target_speed")]
    pub target_speed: f64,
    #[serde(default = "default_speed_tolerance")]
    pub speed_tolerance: f64,
    #[serde(default = "default_true")]
    pub lane_change_enabled: bool,
    #[serde(default)]
    pub right_lane_change_enabled: bool,
    /// Lanes numbered 1..=lane_count. `None` leaves the road unbounded.
    #[serde(default)]
    pub lane_count: Option<u32>,
    /// Seconds of forced lane keeping after a lane change completes or aborts.
    #[serde(default = "default_min_lane_change_dwell")]
    pub min_lane_change_dwell: f64,
    /// Seconds after which an unfinished lane change is aborted.
    #[serde(default = "default_max_lane_change_duration")]
    pub max_lane_change_duration: f64,
}

fn default_target_headway_time() -> f64 {
    2.0
}

fn default_safety_ttc() -> f64 {
    4.0
}

fn default_lane_width() -> f64 {
    4.0
}

fn default_vehicle_length() -> f64 {
    5.0
}

fn default_target_speed() -> f64 {
    30.0
}

fn default_speed_tolerance() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_min_lane_change_dwell() -> f64 {
    1.0
}

fn default_max_lane_change_duration() -> f64 {
    5.0
}

impl DecisionConfig {
    /// Defaults for everything except the caller-supplied sampling time.
    pub fn with_sampling_time(sampling_time: f64) -> Self {
        Self {
            sampling_time,
            target_headway_time: default_target_headway_time(),
            safety_ttc: default_safety_ttc(),
            lane_width: default_lane_width(),
            vehicle_length: default_vehicle_length(),
            target_speed: default_target_speed(),
            speed_tolerance: default_speed_tolerance(),
            lane_change_enabled: true,
            right_lane_change_enabled: false,
            lane_count: None,
            min_lane_change_dwell: default_min_lane_change_dwell(),
            max_lane_change_duration: default_max_lane_change_duration(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        positive("sampling_time", self.sampling_time)?;
        positive("target_headway_time", self.target_headway_time)?;
        positive("safety_ttc", self.safety_ttc)?;
        positive("lane_width", self.lane_width)?;
        positive("vehicle_length", self.vehicle_length)?;
        positive("max_lane_change_duration", self.max_lane_change_duration)?;
        non_negative("target_speed", self.target_speed)?;
        non_negative("speed_tolerance", self.speed_tolerance)?;
        non_negative("min_lane_change_dwell", self.min_lane_change_dwell)?;

        if self.lane_count == Some(0) {
            return Err(DecisionError::InvalidConfig {
                field: "lane_count",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Whole ticks covering `seconds`, rounded up.
    pub fn ticks_for(&self, seconds: f64) -> u32 {
        (seconds / self.sampling_time).ceil() as u32
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DecisionError::InvalidConfig {
            field,
            value,
            reason: "must be finite and > 0",
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DecisionError::InvalidConfig {
            field,
            value,
            reason: "must be finite and >= 0",
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// JSON file with recorded observation frames.
    #[serde(default)]
    pub scenario_path: Option<String>,
    /// Where to write the emitted action codes, one per tick.
    #[serde(default)]
    pub output_path: Option<String>,
    /// Where to write the per-tick decision trace (JSON lines).
    #[serde(default)]
    pub trace_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ============================================================================
// VEHICLES
// ============================================================================

/// One row of the kinematics observation: `presence, x, y, vx, vy, heading`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub presence: bool,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub heading: f64,
}

impl VehicleRecord {
    pub fn new(x: f64, y: f64, vx: f64) -> Self {
        Self {
            presence: true,
            x,
            y,
            vx,
            vy: 0.0,
            heading: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EgoState {
    pub vehicle: VehicleRecord,
    pub lane_index: i32,
}

// ============================================================================
// BEHAVIOR
// ============================================================================

/// Side of the adjacent lane. Lane indices grow to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneSide {
    Left,
    Right,
}

impl LaneSide {
    pub fn lane_offset(&self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }

    /// Lane index next to `lane` on this side, clamped to the `i32` range.
    pub fn adjacent_lane(&self, lane: i32) -> i32 {
        lane.saturating_add(self.lane_offset())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorState {
    LaneKeeping,
    LaneChangeLeft,
    LaneChangeRight,
}

impl BehaviorState {
    pub fn lane_change(side: LaneSide) -> Self {
        match side {
            LaneSide::Left => Self::LaneChangeLeft,
            LaneSide::Right => Self::LaneChangeRight,
        }
    }

    pub fn changing_to(&self) -> Option<LaneSide> {
        match self {
            Self::LaneKeeping => None,
            Self::LaneChangeLeft => Some(LaneSide::Left),
            Self::LaneChangeRight => Some(LaneSide::Right),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LaneKeeping => "LANE_KEEPING",
            Self::LaneChangeLeft => "LANE_CHANGE_LEFT",
            Self::LaneChangeRight => "LANE_CHANGE_RIGHT",
        }
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete meta-action handed to the motion planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    LaneLeft,
    Idle,
    LaneRight,
    Faster,
    Slower,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::LaneLeft,
        Action::Idle,
        Action::LaneRight,
        Action::Faster,
        Action::Slower,
    ];

    pub fn code(&self) -> u8 {
        match self {
            Self::LaneLeft => 0,
            Self::Idle => 1,
            Self::LaneRight => 2,
            Self::Faster => 3,
            Self::Slower => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LaneLeft => "LANE_LEFT",
            Self::Idle => "IDLE",
            Self::LaneRight => "LANE_RIGHT",
            Self::Faster => "FASTER",
            Self::Slower => "SLOWER",
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = u8;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        Action::ALL
            .into_iter()
            .find(|action| action.code() == code)
            .ok_or(code)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LaneChangePhase {
    Started,
    Completed,
    Aborted { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneChangeEvent {
    pub tick: u64,
    pub side: LaneSide,
    pub from_lane: i32,
    pub to_lane: i32,
    pub phase: LaneChangePhase,
}

// src/decision/action.rs

use crate::types::{Action, BehaviorState, DecisionConfig};

/// Lowers the tick's behavior into one meta-action for the motion planner.
#[derive(Debug, Clone)]
pub struct ActionPlanner {
    target_speed: f64,
    speed_tolerance: f64,
}

impl ActionPlanner {
    pub fn new(config: &DecisionConfig) -> Self {
        Self {
            target_speed: config.target_speed,
            speed_tolerance: config.speed_tolerance,
        }
    }

    /// Ego counts as cruising within `speed_tolerance` below the target
    /// speed, or anywhere above it.
    pub fn below_cruise_speed(&self, ego_vx: f64) -> bool {
        ego_vx < self.target_speed - self.speed_tolerance
    }

    pub fn plan(&self, behavior: BehaviorState, reduce_speed: bool, ego_vx: f64) -> Action {
        match behavior {
            BehaviorState::LaneChangeLeft => Action::LaneLeft,
            BehaviorState::LaneChangeRight => Action::LaneRight,
            BehaviorState::LaneKeeping if reduce_speed => Action::Slower,
            BehaviorState::LaneKeeping if self.below_cruise_speed(ego_vx) => Action::Faster,
            BehaviorState::LaneKeeping => Action::Idle,
        }
    }
}

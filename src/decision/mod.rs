// src/decision/mod.rs

pub mod action;
pub mod behavior;
pub mod lane;
pub mod lane_change;
pub mod neighbors;
pub mod safety;
pub mod state_machine;

// Re-export public APIs
pub use action::ActionPlanner;
pub use behavior::{BehaviorDecisionMaking, TickOutcome};
pub use lane::LaneGeometry;
pub use lane_change::LaneChangeEvaluator;
pub use neighbors::{select_neighbors, AdjacentLane, Neighbors};
pub use safety::{headway_time, time_to_collision, TimeGap};
pub use state_machine::{BehaviorStateMachine, StateMachineConfig};

// src/lib.rs
//
// Tactical behavior decision making for highway driving.
//
// Each control tick takes a kinematics observation (ego first, then
// nearby vehicles) and returns one discrete action for the motion
// planner. See decision::BehaviorDecisionMaking.

pub mod config;
pub mod decision;
pub mod error;
pub mod metrics;
pub mod scenario;
pub mod snapshot;
pub mod types;

pub use decision::{BehaviorDecisionMaking, TickOutcome};
pub use error::DecisionError;
pub use types::{Action, BehaviorState, Config, DecisionConfig, LaneSide, VehicleRecord};

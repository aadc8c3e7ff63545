// src/decision/behavior.rs
//
// Single entry point: call update() once per control tick.
//
//   observation → Snapshot → ego lane → Neighbors → BehaviorStateMachine
//               → ActionPlanner → Action
//
// Everything except the state machine is recomputed from the fresh
// observation each tick.

use super::action::ActionPlanner;
use super::lane::LaneGeometry;
use super::lane_change::LaneChangeEvaluator;
use super::neighbors::{select_neighbors, Neighbors};
use super::safety::{headway_time, TimeGap};
use super::state_machine::{BehaviorStateMachine, StateMachineConfig};
use crate::error::Result;
use crate::snapshot::Snapshot;
use crate::types::{Action, BehaviorState, DecisionConfig, EgoState, LaneChangeEvent};
use serde::Serialize;
use tracing::debug;

/// Everything decided on one tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickOutcome {
    pub step: u64,
    pub time_s: f64,
    pub action: Action,
    pub behavior: BehaviorState,
    pub reduce_speed: bool,
    pub ego: EgoState,
    pub neighbors: Neighbors,
    /// Headway to the current-lane leader, if there is one.
    pub front_headway: Option<TimeGap>,
    pub lane_change_event: Option<LaneChangeEvent>,
}

pub struct BehaviorDecisionMaking {
    config: DecisionConfig,
    geometry: LaneGeometry,
    evaluator: LaneChangeEvaluator,
    state_machine: BehaviorStateMachine,
    planner: ActionPlanner,
}

impl BehaviorDecisionMaking {
    pub fn new(config: DecisionConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            geometry: LaneGeometry::new(config.lane_width, config.vehicle_length),
            evaluator: LaneChangeEvaluator::new(&config),
            state_machine: BehaviorStateMachine::new(StateMachineConfig::from_decision(&config)),
            planner: ActionPlanner::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    pub fn behavior_state(&self) -> BehaviorState {
        self.state_machine.state()
    }

    /// Decide the action for tick `step`.
    pub fn update<R: AsRef<[f64]>>(&mut self, observation: &[R], step: u64) -> Result<Action> {
        self.tick(observation, step).map(|outcome| outcome.action)
    }

    /// Like [`update`](Self::update), but returns the full decision trace.
    pub fn tick<R: AsRef<[f64]>>(&mut self, observation: &[R], step: u64) -> Result<TickOutcome> {
        let snapshot = Snapshot::read(observation)?;
        let ego = self.geometry.ego_state(snapshot.ego);
        let neighbors = select_neighbors(&snapshot, &ego, &self.geometry);

        let lane_change_event = self
            .state_machine
            .update(&ego, &neighbors, &self.evaluator, step);
        let behavior = self.state_machine.state();
        let reduce_speed = self
            .state_machine
            .decide_reducing_speed(&ego, &neighbors, &self.evaluator);
        let action = self.planner.plan(behavior, reduce_speed, ego.vehicle.vx);

        let front_headway = neighbors
            .current_front
            .map(|front| headway_time(&front, &ego.vehicle, self.geometry.vehicle_length));
        let time_s = step as f64 * self.config.sampling_time;

        debug!(
            "[{:.2} sec] position {:.2} {:.2} / velocity {:.2} / lane {} / {} → {}",
            time_s,
            ego.vehicle.x,
            -ego.vehicle.y,
            ego.vehicle.vx,
            ego.lane_index,
            behavior,
            action
        );

        Ok(TickOutcome {
            step,
            time_s,
            action,
            behavior,
            reduce_speed,
            ego,
            neighbors,
            front_headway,
            lane_change_event,
        })
    }
}

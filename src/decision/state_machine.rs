// src/decision/state_machine.rs
//
// Persistent behavior of one ego vehicle.
//
//   LaneKeeping ──(incentive && safe)──▶ LaneChange{Left,Right}
//        ▲                                     │
//        └──── completed / aborted + dwell ◀───┘
//
// A lane change completes once ego's lane index reaches the target lane.
// It aborts if ego drifts anywhere else, if the target lane turns unsafe
// while ego is still in its origin lane, or if it runs out of time. After
// either outcome ego keeps its lane for a dwell period before another
// change is considered.

use super::lane_change::LaneChangeEvaluator;
use super::neighbors::Neighbors;
use crate::types::{
    BehaviorState, DecisionConfig, EgoState, LaneChangeEvent, LaneChangePhase, LaneSide,
};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Maneuver {
    side: LaneSide,
    origin_lane: i32,
    target_lane: i32,
    ticks: u32,
}

#[derive(Debug, Clone)]
pub struct StateMachineConfig {
    pub lane_change_enabled: bool,
    /// Sides evaluated each tick, in priority order.
    pub sides: Vec<LaneSide>,
    pub dwell_ticks: u32,
    pub max_lane_change_ticks: u32,
}

impl StateMachineConfig {
    pub fn from_decision(config: &DecisionConfig) -> Self {
        let mut sides = vec![LaneSide::Left];
        if config.right_lane_change_enabled {
            sides.push(LaneSide::Right);
        }
        Self {
            lane_change_enabled: config.lane_change_enabled,
            sides,
            dwell_ticks: config.ticks_for(config.min_lane_change_dwell),
            max_lane_change_ticks: config.ticks_for(config.max_lane_change_duration),
        }
    }
}

pub struct BehaviorStateMachine {
    config: StateMachineConfig,
    state: BehaviorState,
    maneuver: Option<Maneuver>,
    dwell_remaining: u32,
}

impl BehaviorStateMachine {
    pub fn new(config: StateMachineConfig) -> Self {
        Self {
            config,
            state: BehaviorState::LaneKeeping,
            maneuver: None,
            dwell_remaining: 0,
        }
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn dwell_remaining(&self) -> u32 {
        self.dwell_remaining
    }

    /// Advance one tick. Returns an event when a lane change starts,
    /// completes or aborts.
    pub fn update(
        &mut self,
        ego: &EgoState,
        neighbors: &Neighbors,
        evaluator: &LaneChangeEvaluator,
        tick: u64,
    ) -> Option<LaneChangeEvent> {
        match self.maneuver {
            None => self.keep_lane(ego, neighbors, evaluator, tick),
            Some(maneuver) => self.continue_lane_change(maneuver, ego, neighbors, evaluator, tick),
        }
    }

    /// Car following: slow down while the current-lane leader is closer
    /// than the target headway.
    pub fn decide_reducing_speed(
        &self,
        ego: &EgoState,
        neighbors: &Neighbors,
        evaluator: &LaneChangeEvaluator,
    ) -> bool {
        neighbors
            .current_front
            .map_or(false, |front| evaluator.is_constraining(&front, ego))
    }

    fn keep_lane(
        &mut self,
        ego: &EgoState,
        neighbors: &Neighbors,
        evaluator: &LaneChangeEvaluator,
        tick: u64,
    ) -> Option<LaneChangeEvent> {
        if self.dwell_remaining > 0 {
            self.dwell_remaining -= 1;
            return None;
        }
        if !self.config.lane_change_enabled {
            return None;
        }

        let side = self
            .config
            .sides
            .iter()
            .copied()
            .find(|side| evaluator.decide_lane_change(neighbors, ego, *side))?;

        let maneuver = Maneuver {
            side,
            origin_lane: ego.lane_index,
            target_lane: side.adjacent_lane(ego.lane_index),
            ticks: 0,
        };
        self.maneuver = Some(maneuver);
        self.state = BehaviorState::lane_change(side);

        info!(
            "→ Lane change {} started: lane {} → {}",
            side.as_str(),
            maneuver.origin_lane,
            maneuver.target_lane
        );

        Some(LaneChangeEvent {
            tick,
            side,
            from_lane: maneuver.origin_lane,
            to_lane: maneuver.target_lane,
            phase: LaneChangePhase::Started,
        })
    }

    fn continue_lane_change(
        &mut self,
        mut maneuver: Maneuver,
        ego: &EgoState,
        neighbors: &Neighbors,
        evaluator: &LaneChangeEvaluator,
        tick: u64,
    ) -> Option<LaneChangeEvent> {
        maneuver.ticks += 1;

        let phase = if ego.lane_index == maneuver.target_lane {
            info!(
                "✓ Lane change {} completed after {} ticks: now in lane {}",
                maneuver.side.as_str(),
                maneuver.ticks,
                ego.lane_index
            );
            LaneChangePhase::Completed
        } else if ego.lane_index != maneuver.origin_lane {
            self.abort(&maneuver, format!("ego drifted into lane {}", ego.lane_index))
        } else if !evaluator.safety_gate(neighbors, ego, maneuver.side) {
            self.abort(&maneuver, "target lane no longer safe".to_string())
        } else if maneuver.ticks >= self.config.max_lane_change_ticks {
            self.abort(
                &maneuver,
                format!("not completed within {} ticks", self.config.max_lane_change_ticks),
            )
        } else {
            debug!(
                "Lane change {} in progress ({} ticks)",
                maneuver.side.as_str(),
                maneuver.ticks
            );
            self.maneuver = Some(maneuver);
            return None;
        };

        self.finish_maneuver();

        Some(LaneChangeEvent {
            tick,
            side: maneuver.side,
            from_lane: maneuver.origin_lane,
            to_lane: maneuver.target_lane,
            phase,
        })
    }

    fn abort(&self, maneuver: &Maneuver, reason: String) -> LaneChangePhase {
        warn!(
            "✗ Lane change {} aborted ({} → {}): {}",
            maneuver.side.as_str(),
            maneuver.origin_lane,
            maneuver.target_lane,
            reason
        );
        LaneChangePhase::Aborted { reason }
    }

    fn finish_maneuver(&mut self) {
        self.state = BehaviorState::LaneKeeping;
        self.maneuver = None;
        self.dwell_remaining = self.config.dwell_ticks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::neighbors::AdjacentLane;
    use crate::types::VehicleRecord;

    fn config() -> DecisionConfig {
        let mut config = DecisionConfig::with_sampling_time(0.5);
        config.min_lane_change_dwell = 1.0; // 2 ticks
        config.max_lane_change_duration = 2.0; // 4 ticks
        config
    }

    fn machine(config: &DecisionConfig) -> (BehaviorStateMachine, LaneChangeEvaluator) {
        (
            BehaviorStateMachine::new(StateMachineConfig::from_decision(config)),
            LaneChangeEvaluator::new(config),
        )
    }

    fn ego_in(lane_index: i32) -> EgoState {
        EgoState {
            vehicle: VehicleRecord::new(100.0, 4.0 * f64::from(lane_index - 1), 20.0),
            lane_index,
        }
    }

    fn blocked_ahead() -> Neighbors {
        Neighbors {
            current_front: Some(VehicleRecord::new(110.0, 0.0, 15.0)),
            ..Neighbors::default()
        }
    }

    #[test]
    fn test_starts_in_lane_keeping() {
        let (sm, _) = machine(&config());
        assert_eq!(sm.state(), BehaviorState::LaneKeeping);
        assert_eq!(sm.dwell_remaining(), 0);
    }

    #[test]
    fn test_stays_in_lane_without_incentive() {
        let (mut sm, eval) = machine(&config());
        let event = sm.update(&ego_in(2), &Neighbors::default(), &eval, 0);
        assert!(event.is_none());
        assert_eq!(sm.state(), BehaviorState::LaneKeeping);
    }

    #[test]
    fn test_starts_left_change_when_blocked() {
        let (mut sm, eval) = machine(&config());
        let event = sm.update(&ego_in(2), &blocked_ahead(), &eval, 7).unwrap();

        assert_eq!(sm.state(), BehaviorState::LaneChangeLeft);
        assert_eq!(event.tick, 7);
        assert_eq!(event.side, LaneSide::Left);
        assert_eq!(event.from_lane, 2);
        assert_eq!(event.to_lane, 1);
        assert_eq!(event.phase, LaneChangePhase::Started);
    }

    #[test]
    fn test_completion_then_dwell() {
        let (mut sm, eval) = machine(&config());
        sm.update(&ego_in(2), &blocked_ahead(), &eval, 0);

        // Still in origin lane, target lane safe: keep changing.
        assert!(sm.update(&ego_in(2), &blocked_ahead(), &eval, 1).is_none());
        assert_eq!(sm.state(), BehaviorState::LaneChangeLeft);

        let done = sm.update(&ego_in(1), &blocked_ahead(), &eval, 2).unwrap();
        assert_eq!(done.phase, LaneChangePhase::Completed);
        assert_eq!(sm.state(), BehaviorState::LaneKeeping);
        assert_eq!(sm.dwell_remaining(), 2);

        // Blocked again in the new lane, but dwell holds for two ticks.
        assert!(sm.update(&ego_in(1), &blocked_ahead(), &eval, 3).is_none());
        assert!(sm.update(&ego_in(1), &blocked_ahead(), &eval, 4).is_none());
        assert_eq!(sm.state(), BehaviorState::LaneKeeping);

        let again = sm.update(&ego_in(1), &blocked_ahead(), &eval, 5).unwrap();
        assert_eq!(again.phase, LaneChangePhase::Started);
        assert_eq!(again.to_lane, 0);
    }

    #[test]
    fn test_aborts_when_target_lane_turns_unsafe() {
        let (mut sm, eval) = machine(&config());
        sm.update(&ego_in(2), &blocked_ahead(), &eval, 0);

        let closing_rear = Neighbors {
            left: AdjacentLane {
                front: None,
                rear: Some(VehicleRecord::new(80.0, 0.0, 35.0)),
            },
            ..blocked_ahead()
        };
        let event = sm.update(&ego_in(2), &closing_rear, &eval, 1).unwrap();

        assert!(matches!(event.phase, LaneChangePhase::Aborted { .. }));
        assert_eq!(sm.state(), BehaviorState::LaneKeeping);
        assert_eq!(sm.dwell_remaining(), 2);
    }

    #[test]
    fn test_aborts_on_timeout() {
        let (mut sm, eval) = machine(&config());
        sm.update(&ego_in(2), &blocked_ahead(), &eval, 0);

        // 2.0s at 0.5s per tick: ticks 0..=3 belong to the change.
        for tick in 1..=3 {
            assert!(sm.update(&ego_in(2), &blocked_ahead(), &eval, tick).is_none());
            assert_eq!(sm.state(), BehaviorState::LaneChangeLeft);
        }
        let event = sm.update(&ego_in(2), &blocked_ahead(), &eval, 4).unwrap();
        assert!(matches!(event.phase, LaneChangePhase::Aborted { .. }));
        assert_eq!(sm.state(), BehaviorState::LaneKeeping);
    }

    #[test]
    fn test_aborts_when_ego_drifts_the_wrong_way() {
        let (mut sm, eval) = machine(&config());
        sm.update(&ego_in(2), &blocked_ahead(), &eval, 0);

        let event = sm.update(&ego_in(3), &Neighbors::default(), &eval, 1).unwrap();
        assert!(matches!(event.phase, LaneChangePhase::Aborted { .. }));
    }

    #[test]
    fn test_disabled_lane_change_never_starts() {
        let mut config = config();
        config.lane_change_enabled = false;
        let (mut sm, eval) = machine(&config);

        assert!(sm.update(&ego_in(2), &blocked_ahead(), &eval, 0).is_none());
        assert_eq!(sm.state(), BehaviorState::LaneKeeping);
    }

    #[test]
    fn test_right_change_only_when_enabled() {
        let left_blocked = Neighbors {
            left: AdjacentLane {
                front: Some(VehicleRecord::new(112.0, 0.0, 15.0)),
                rear: None,
            },
            ..blocked_ahead()
        };

        let (mut sm, eval) = machine(&config());
        assert!(sm.update(&ego_in(2), &left_blocked, &eval, 0).is_none());

        let mut config = config();
        config.right_lane_change_enabled = true;
        let (mut sm, eval) = machine(&config);
        let event = sm.update(&ego_in(2), &left_blocked, &eval, 0).unwrap();
        assert_eq!(event.side, LaneSide::Right);
        assert_eq!(event.to_lane, 3);
        assert_eq!(sm.state(), BehaviorState::LaneChangeRight);
    }

    #[test]
    fn test_reducing_speed_is_strict() {
        let (sm, eval) = machine(&config());
        let ego = ego_in(1);

        // headway = (145 - 100 - 5) / 20 = 2.0s, exactly the target
        let at_target = Neighbors {
            current_front: Some(VehicleRecord::new(145.0, 0.0, 15.0)),
            ..Neighbors::default()
        };
        assert!(!sm.decide_reducing_speed(&ego, &at_target, &eval));
        assert!(sm.decide_reducing_speed(&ego, &blocked_ahead(), &eval));
        assert!(!sm.decide_reducing_speed(&ego, &Neighbors::default(), &eval));
    }
}

// src/decision/lane_change.rs
//
// Simplified MOBIL for discretionary lane changes.
//
//   incentive: the current-lane leader forces ego to slow down, and the
//              leader in the target lane would not.
//   safety:    TTC to the target-lane leader and from the target-lane
//              follower both exceed `safety_ttc`.
//
// An absent neighbor never blocks a change. Without a constraining leader
// in the current lane there is nothing to gain, so no incentive.

use super::neighbors::Neighbors;
use super::safety::{headway_time, time_to_collision};
use crate::types::{DecisionConfig, EgoState, LaneSide, VehicleRecord};

#[derive(Debug, Clone)]
pub struct LaneChangeEvaluator {
    target_headway_time: f64,
    safety_ttc: f64,
    vehicle_length: f64,
    lane_count: Option<u32>,
}

impl LaneChangeEvaluator {
    pub fn new(config: &DecisionConfig) -> Self {
        Self {
            target_headway_time: config.target_headway_time,
            safety_ttc: config.safety_ttc,
            vehicle_length: config.vehicle_length,
            lane_count: config.lane_count,
        }
    }

    /// Ego following `front` closer than the target headway.
    pub fn is_constraining(&self, front: &VehicleRecord, ego: &EgoState) -> bool {
        headway_time(front, &ego.vehicle, self.vehicle_length).is_below(self.target_headway_time)
    }

    pub fn discretionary_incentive(
        &self,
        neighbors: &Neighbors,
        ego: &EgoState,
        side: LaneSide,
    ) -> bool {
        let Some(current_front) = neighbors.current_front else {
            return false;
        };
        if !self.is_constraining(&current_front, ego) {
            return false;
        }

        match neighbors.side(side).front {
            Some(target_front) => !self.is_constraining(&target_front, ego),
            None => true,
        }
    }

    pub fn safety_gate(&self, neighbors: &Neighbors, ego: &EgoState, side: LaneSide) -> bool {
        let lane = neighbors.side(side);

        let front_clear = lane.front.map_or(true, |front| {
            time_to_collision(&front, &ego.vehicle, self.vehicle_length).exceeds(self.safety_ttc)
        });
        let rear_clear = lane.rear.map_or(true, |rear| {
            time_to_collision(&ego.vehicle, &rear, self.vehicle_length).exceeds(self.safety_ttc)
        });

        front_clear && rear_clear
    }

    /// Whether the lane on `side` exists. Unbounded roads always have one.
    pub fn target_lane_exists(&self, ego: &EgoState, side: LaneSide) -> bool {
        let target = side.adjacent_lane(ego.lane_index);
        match self.lane_count {
            Some(count) => target >= 1 && i64::from(target) <= i64::from(count),
            None => true,
        }
    }

    pub fn decide_lane_change(&self, neighbors: &Neighbors, ego: &EgoState, side: LaneSide) -> bool {
        self.target_lane_exists(ego, side)
            && self.discretionary_incentive(neighbors, ego, side)
            && self.safety_gate(neighbors, ego, side)
    }
}

// src/decision/lane.rs

use crate::types::{EgoState, VehicleRecord};

/// Road and vehicle geometry shared by lane indexing and gap computations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneGeometry {
    pub lane_width: f64,
    pub vehicle_length: f64,
}

impl LaneGeometry {
    pub fn new(lane_width: f64, vehicle_length: f64) -> Self {
        Self {
            lane_width,
            vehicle_length,
        }
    }

    /// 1-based lane index of a lateral position.
    ///
    /// Lane 1 is centered on `y = 0` and covers `[-w/2, w/2)`: the lower
    /// edge belongs to the lane, the upper edge to the next one. Lanes
    /// continue past the road in both directions, so every finite `y`
    /// maps to some index (possibly zero or negative). Offsets beyond the
    /// `i32` range clamp to its ends.
    pub fn lane_index(&self, y: f64) -> i32 {
        // Add in floating point: the cast saturates, an integer `+ 1` could overflow.
        (((y + self.lane_width / 2.0) / self.lane_width).floor() + 1.0) as i32
    }

    pub fn lane_of(&self, vehicle: &VehicleRecord) -> i32 {
        self.lane_index(vehicle.y)
    }

    pub fn ego_state(&self, vehicle: VehicleRecord) -> EgoState {
        EgoState {
            vehicle,
            lane_index: self.lane_of(&vehicle),
        }
    }
}

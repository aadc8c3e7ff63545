// src/decision/safety.rs
//
// Car-following gaps between an ordered (front, rear) pair of vehicles.
// Both functions are pure; they never return a non-finite or NaN value.

use crate::types::VehicleRecord;
use serde::Serialize;
use std::fmt;

/// Time until something happens. `Unbounded` means it never will at
/// current velocities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TimeGap {
    Finite(f64),
    Unbounded,
}

impl TimeGap {
    pub fn is_below(&self, threshold: f64) -> bool {
        match self {
            Self::Finite(t) => *t < threshold,
            Self::Unbounded => false,
        }
    }

    pub fn exceeds(&self, threshold: f64) -> bool {
        match self {
            Self::Finite(t) => *t > threshold,
            Self::Unbounded => true,
        }
    }

    pub fn seconds(&self) -> Option<f64> {
        match self {
            Self::Finite(t) => Some(*t),
            Self::Unbounded => None,
        }
    }
}

impl fmt::Display for TimeGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(t) => write!(f, "{:.2}s", t),
            Self::Unbounded => f.write_str("inf"),
        }
    }
}

/// Seconds for `rear` to close the bumper gap to `front` at its current
/// speed, with `front` held still. A rear vehicle that is stopped or
/// reversing never closes the gap.
pub fn headway_time(front: &VehicleRecord, rear: &VehicleRecord, vehicle_length: f64) -> TimeGap {
    if rear.vx <= 0.0 {
        return TimeGap::Unbounded;
    }
    let relative_distance = front.x - rear.x - vehicle_length;
    TimeGap::Finite(relative_distance / rear.vx)
}

/// Time to collision of `rear` into `front` at current velocities.
pub fn time_to_collision(
    front: &VehicleRecord,
    rear: &VehicleRecord,
    vehicle_length: f64,
) -> TimeGap {
    let relative_distance = front.x - rear.x - vehicle_length;
    let relative_velocity = rear.vx - front.vx;

    if relative_distance <= 0.0 {
        // Bumpers already overlap.
        TimeGap::Finite(0.0)
    } else if relative_velocity <= 0.0 {
        TimeGap::Unbounded
    } else {
        TimeGap::Finite(relative_distance / relative_velocity)
    }
}

// src/decision/neighbors.rs
//
// Picks the vehicles that matter to ego this tick:
//
//   current lane:  closest ahead
//   left lane:     closest ahead, closest behind
//   right lane:    closest ahead, closest behind
//
// "Ahead" includes vehicles level with ego (x >= ego.x). Ties in distance
// keep the first vehicle in observation order.

use super::lane::LaneGeometry;
use crate::snapshot::Snapshot;
use crate::types::{EgoState, LaneSide, VehicleRecord};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AdjacentLane {
    pub front: Option<VehicleRecord>,
    pub rear: Option<VehicleRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Neighbors {
    pub current_front: Option<VehicleRecord>,
    pub left: AdjacentLane,
    pub right: AdjacentLane,
}

impl Neighbors {
    pub fn side(&self, side: LaneSide) -> &AdjacentLane {
        match side {
            LaneSide::Left => &self.left,
            LaneSide::Right => &self.right,
        }
    }

    pub fn count(&self) -> usize {
        [
            self.current_front,
            self.left.front,
            self.left.rear,
            self.right.front,
            self.right.rear,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }
}

pub fn select_neighbors(snapshot: &Snapshot, ego: &EgoState, geometry: &LaneGeometry) -> Neighbors {
    let ego_x = ego.vehicle.x;
    let ego_lane = ego.lane_index;

    let (front, rear): (Vec<(i32, &VehicleRecord)>, Vec<(i32, &VehicleRecord)>) = snapshot
        .present_others()
        .map(|v| (geometry.lane_of(v), v))
        .partition(|(_, v)| v.x >= ego_x);

    Neighbors {
        current_front: closest_in_lane(&front, ego_x, ego_lane),
        left: AdjacentLane {
            front: closest_in_lane(&front, ego_x, LaneSide::Left.adjacent_lane(ego_lane)),
            rear: closest_in_lane(&rear, ego_x, LaneSide::Left.adjacent_lane(ego_lane)),
        },
        right: AdjacentLane {
            front: closest_in_lane(&front, ego_x, LaneSide::Right.adjacent_lane(ego_lane)),
            rear: closest_in_lane(&rear, ego_x, LaneSide::Right.adjacent_lane(ego_lane)),
        },
    }
}

fn closest_in_lane(
    vehicles: &[(i32, &VehicleRecord)],
    ego_x: f64,
    lane: i32,
) -> Option<VehicleRecord> {
    closest_vehicle(
        vehicles
            .iter()
            .filter(|(l, _)| *l == lane)
            .map(|(_, v)| *v),
        ego_x,
    )
}

/// Vehicle with the smallest longitudinal distance to `ego_x`; the first
/// one wins on ties.
pub fn closest_vehicle<'a>(
    vehicles: impl Iterator<Item = &'a VehicleRecord>,
    ego_x: f64,
) -> Option<VehicleRecord> {
    vehicles
        .min_by(|a, b| (a.x - ego_x).abs().total_cmp(&(b.x - ego_x).abs()))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(x: f64, y: f64, vx: f64) -> Vec<f64> {
        vec![1.0, x, y, vx, 0.0, 0.0]
    }

    fn absent() -> Vec<f64> {
        vec![0.0; 6]
    }

    fn select(obs: &[Vec<f64>]) -> Neighbors {
        let geometry = LaneGeometry::new(4.0, 5.0);
        let snapshot = Snapshot::read(obs).unwrap();
        let ego = geometry.ego_state(snapshot.ego);
        select_neighbors(&snapshot, &ego, &geometry)
    }

    #[test]
    fn test_assigns_roles_by_lane_and_side() {
        // Ego in lane 2 (y = 4).
        let neighbors = select(&[
            row(100.0, 4.0, 20.0),
            row(130.0, 4.0, 18.0),  // current front
            row(120.0, 0.0, 22.0),  // left front
            row(80.0, 0.0, 25.0),   // left rear
            row(115.0, 8.0, 21.0),  // right front
            row(90.0, 8.0, 19.0),   // right rear
            row(70.0, 4.0, 20.0),   // current rear, unused
            row(140.0, 12.0, 20.0), // two lanes right, unused
        ]);

        assert_eq!(neighbors.current_front.map(|v| v.x), Some(130.0));
        assert_eq!(neighbors.left.front.map(|v| v.x), Some(120.0));
        assert_eq!(neighbors.left.rear.map(|v| v.x), Some(80.0));
        assert_eq!(neighbors.right.front.map(|v| v.x), Some(115.0));
        assert_eq!(neighbors.right.rear.map(|v| v.x), Some(90.0));
        assert_eq!(neighbors.count(), 5);
    }

    #[test]
    fn test_picks_closest_candidate() {
        let neighbors = select(&[
            row(100.0, 0.0, 20.0),
            row(160.0, 0.0, 20.0),
            row(125.0, 0.5, 20.0),
            row(140.0, -0.5, 20.0),
        ]);
        assert_eq!(neighbors.current_front.map(|v| v.x), Some(125.0));
    }

    #[test]
    fn test_tie_keeps_first_in_observation_order() {
        let neighbors = select(&[
            row(100.0, 0.0, 20.0),
            row(120.0, -4.0, 11.0),
            row(120.0, -4.0, 22.0),
        ]);
        assert_eq!(neighbors.left.front.map(|v| v.vx), Some(11.0));
    }

    #[test]
    fn test_level_vehicle_counts_as_front() {
        let neighbors = select(&[row(100.0, 0.0, 20.0), row(100.0, -4.0, 20.0)]);
        assert!(neighbors.left.front.is_some());
        assert!(neighbors.left.rear.is_none());
    }

    #[test]
    fn test_absent_records_are_ignored() {
        let neighbors = select(&[row(100.0, 0.0, 20.0), absent(), absent()]);
        assert_eq!(neighbors, Neighbors::default());
        assert_eq!(neighbors.count(), 0);
    }

    #[test]
    fn test_ego_alone_has_no_neighbors() {
        let neighbors = select(&[row(100.0, 0.0, 20.0)]);
        assert!(neighbors.current_front.is_none());
        assert!(neighbors.left.front.is_none());
        assert!(neighbors.left.rear.is_none());
    }
}

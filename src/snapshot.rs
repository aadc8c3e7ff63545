// src/snapshot.rs
//
// Reads one tick's kinematics observation. Row 0 is ego, the rest are
// candidate neighbors in the order the environment reported them.
// Absent rows (presence = 0) are zero-filled by the environment and are
// kept in place so indices stay aligned with the observation.

use crate::error::{DecisionError, Result};
use crate::types::VehicleRecord;

pub const PRESENCE: usize = 0;
pub const X: usize = 1;
pub const Y: usize = 2;
pub const VX: usize = 3;
pub const VY: usize = 4;
pub const HEADING: usize = 5;

/// `presence, x, y, vx, vy`; heading is optional.
pub const MIN_FEATURES: usize = 5;

const FIELD_NAMES: [&str; 6] = ["presence", "x", "y", "vx", "vy", "heading"];

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub ego: VehicleRecord,
    pub others: Vec<VehicleRecord>,
}

impl Snapshot {
    pub fn read<R: AsRef<[f64]>>(observation: &[R]) -> Result<Self> {
        let (ego_row, other_rows) = observation.split_first().ok_or(DecisionError::EmptySnapshot)?;

        let ego = parse_record(0, ego_row.as_ref())?;
        if !ego.presence {
            return Err(DecisionError::EgoAbsent);
        }

        let others = other_rows
            .iter()
            .enumerate()
            .map(|(i, row)| parse_record(i + 1, row.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { ego, others })
    }

    pub fn present_others(&self) -> impl Iterator<Item = &VehicleRecord> {
        self.others.iter().filter(|v| v.presence)
    }
}

fn parse_record(index: usize, row: &[f64]) -> Result<VehicleRecord> {
    if row.len() < MIN_FEATURES {
        return Err(DecisionError::MalformedRecord {
            index,
            len: row.len(),
            expected: MIN_FEATURES,
        });
    }

    // Presence is a 0/1 flag carried as a float.
    let presence = row[PRESENCE] >= 0.5;
    let record = VehicleRecord {
        presence,
        x: row[X],
        y: row[Y],
        vx: row[VX],
        vy: row[VY],
        heading: row.get(HEADING).copied().unwrap_or(0.0),
    };

    if presence {
        let fields = [record.x, record.y, record.vx, record.vy];
        if let Some(field) = fields.iter().position(|v| !v.is_finite()) {
            return Err(DecisionError::NonFiniteField {
                index,
                field: FIELD_NAMES[field + 1],
            });
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_ego_and_neighbors() {
        let obs = vec![
            vec![1.0, 100.0, 0.0, 20.0, 0.0, 0.0],
            vec![1.0, 110.0, 4.0, 15.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        ];
        let snapshot = Snapshot::read(&obs).unwrap();

        assert_eq!(snapshot.ego.x, 100.0);
        assert_eq!(snapshot.ego.vx, 20.0);
        assert_eq!(snapshot.others.len(), 2);
        assert_eq!(snapshot.present_others().count(), 1);
    }

    #[test]
    fn test_heading_is_optional() {
        let obs = [[1.0, 100.0, 0.0, 20.0, 0.0]];
        let snapshot = Snapshot::read(&obs).unwrap();
        assert_eq!(snapshot.ego.heading, 0.0);
        assert!(snapshot.others.is_empty());
    }

    #[test]
    fn test_empty_observation_fails_fast() {
        let obs: Vec<Vec<f64>> = Vec::new();
        assert_eq!(Snapshot::read(&obs), Err(DecisionError::EmptySnapshot));
    }

    #[test]
    fn test_short_record_is_rejected() {
        let obs = vec![vec![1.0, 100.0, 0.0, 20.0, 0.0], vec![1.0, 110.0, 0.0]];
        assert_eq!(
            Snapshot::read(&obs),
            Err(DecisionError::MalformedRecord {
                index: 1,
                len: 3,
                expected: MIN_FEATURES
            })
        );
    }

    #[test]
    fn test_absent_ego_is_rejected() {
        let obs = [[0.0, 100.0, 0.0, 20.0, 0.0, 0.0]];
        assert_eq!(Snapshot::read(&obs), Err(DecisionError::EgoAbsent));
    }

    #[test]
    fn test_non_finite_only_checked_for_present_rows() {
        let obs = vec![
            vec![1.0, 100.0, 0.0, 20.0, 0.0, 0.0],
            vec![0.0, f64::NAN, 0.0, 0.0, 0.0, 0.0],
        ];
        assert!(Snapshot::read(&obs).is_ok());

        let obs = vec![
            vec![1.0, 100.0, 0.0, 20.0, 0.0, 0.0],
            vec![1.0, 120.0, 0.0, f64::INFINITY, 0.0, 0.0],
        ];
        assert_eq!(
            Snapshot::read(&obs),
            Err(DecisionError::NonFiniteField {
                index: 1,
                field: "vx"
            })
        );
    }
}

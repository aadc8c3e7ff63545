// src/error.rs

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DecisionError {
    #[error("invalid configuration: {field} = {value} ({reason})")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("observation is empty, expected the ego vehicle at index 0")]
    EmptySnapshot,

    #[error("vehicle record {index} has {len} features, expected at least {expected}")]
    MalformedRecord {
        index: usize,
        len: usize,
        expected: usize,
    },

    #[error("ego vehicle record is flagged as not present")]
    EgoAbsent,

    #[error("vehicle record {index} has a non-finite {field}")]
    NonFiniteField { index: usize, field: &'static str },
}

pub type Result<T> = std::result::Result<T, DecisionError>;

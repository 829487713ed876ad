use thiserror::Error;

use crate::node::NodeId;

/// Precondition violations raised while building or comparing labels.
///
/// These indicate corrupted driver state or malformed instance data and are
/// never part of a normal search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LabelError {
    #[error("labels belong to different nodes: expected {expected}, found {found}")]
    NodeMismatch { expected: NodeId, found: NodeId },

    #[error("{what} has length {found}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("a supporting-point profile needs at least 2 breakpoints, got {0}")]
    TooFewBreakpoints(usize),

    #[error("breakpoint times must be strictly increasing (violated at index {index})")]
    NonIncreasingTimes { index: usize },

    #[error("breakpoint socs must be non-decreasing (violated at index {index})")]
    DecreasingSoc { index: usize },

    #[error("{what}[{index}] is not finite")]
    NonFinite { what: &'static str, index: usize },

    #[error("soc {soc} exceeds battery capacity {capacity}")]
    SocAboveCapacity { soc: f64, capacity: f64 },

    #[error("soc {soc} is below zero")]
    NegativeSoc { soc: f64 },

    #[error("label id space exhausted")]
    LabelIdsExhausted,
}

/// Failures of [`LabelQueue`](crate::LabelQueue) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("entry is not tracked by the queue")]
    NotFound,

    #[error("pop from an empty queue")]
    Empty,

    #[error("priority does not compare with itself")]
    UnorderedPriority,
}

/// Failures of the instance data provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstanceError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("node at index {index} has id {id}")]
    NodeIdMismatch { index: usize, id: NodeId },

    #[error("node {0} is not a charging station")]
    NotAChargingStation(NodeId),

    #[error("charging station {0} has no charging type")]
    MissingChargingType(NodeId),

    #[error("charging station {node} refers to unknown charging type {cs_type}")]
    UnknownChargingType { node: NodeId, cs_type: usize },

    #[error("{what} has {found} entries, expected {expected}")]
    MatrixShape {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("soc {soc} lies below the charging function (min {min})")]
    SocBelowFunction { soc: f64, min: f64 },

    #[error("soc {soc} lies beyond the charging function (max {max})")]
    SocBeyondFunction { soc: f64, max: f64 },

    #[error("charging function is flat at breakpoint {index}")]
    FlatChargingSegment { index: usize },

    #[error("invalid charging function: {0}")]
    Label(#[from] LabelError),
}

/// Failures of [`Frontiers::admit`](crate::Frontiers::admit).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrontierError {
    #[error("no frontier for node {0}")]
    UnknownNode(NodeId),

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

//! Network-specific error types.

use crate::network::id::{NodeId, Selector};
use thiserror::Error;

/// Failures of the message substrate or of a worker running on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubstrateError {
    #[error("send from {from} to {to} failed: receiver is gone")]
    SendFailed { from: NodeId, to: NodeId },

    #[error("{at} lost its link from {from} before a value arrived")]
    PeerDisconnected { at: NodeId, from: NodeId },

    #[error("no link between {from} and {to} in this mesh")]
    UnknownPeer { from: NodeId, to: NodeId },

    #[error("worker for {0} panicked")]
    WorkerPanicked(NodeId),
}

impl SubstrateError {
    /// True for errors that are only a consequence of another node failing first.
    pub fn is_cascade(&self) -> bool {
        matches!(self, SubstrateError::PeerDisconnected { .. })
    }

    /// How likely this error is to be the origin of a failed run.
    ///
    /// A send only fails once its receiver has already exited, which in turn
    /// only happens after a failure upstream of the receiver.
    pub fn root_rank(&self) -> u8 {
        match self {
            SubstrateError::WorkerPanicked(_) | SubstrateError::UnknownPeer { .. } => 2,
            SubstrateError::SendFailed { .. } => 1,
            SubstrateError::PeerDisconnected { .. } => 0,
        }
    }
}

pub type SubstrateResult<T> = std::result::Result<T, SubstrateError>;

/// Ways a wiring table can fail validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("entry {index} holds {found}; nodes must be listed in id order")]
    MisplacedNode { index: usize, found: NodeId },

    #[error("{node} routes its {selector} output to unknown node {target}")]
    UnknownTarget {
        node: NodeId,
        selector: Selector,
        target: NodeId,
    },

    #[error("entry nodes must be the first nodes in the table; {0} is not")]
    EntryOutOfPlace(NodeId),

    #[error("raw slot {slot} is not consumed exactly once in distribution order")]
    RawSlot { slot: usize },

    #[error("{node} reads {from}:{selector}, but {from} does not send it there")]
    DanglingInput {
        node: NodeId,
        from: NodeId,
        selector: Selector,
    },

    #[error("{node} takes both inputs from {from}")]
    SharedSource { node: NodeId, from: NodeId },

    #[error("{node}:{selector} is sent to {target}, which never reads it")]
    UnconsumedOutput {
        node: NodeId,
        selector: Selector,
        target: NodeId,
    },

    #[error("collection expects {actual} values from {node}, but it sends {expected}")]
    CollectionMismatch {
        node: NodeId,
        expected: usize,
        actual: usize,
    },

    #[error("cycle detected in wiring graph")]
    CycleDetected,

    #[error("expected {expected} input values, got {actual}")]
    InputLength { expected: usize, actual: usize },
}

pub type TopologyResult<T> = std::result::Result<T, TopologyError>;

//! Identity types for the sorting network.
//!
//! `NodeId` is a newtype over `u32` that doubles as a direct index into the
//! topology table and the mesh's endpoint vectors, giving O(1) lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The unit being sorted.
pub type Value = i32;

/// Identity of one compare-exchange node. Node 0 is also the coordinator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const INVALID: NodeId = NodeId(u32::MAX);

    /// The node that distributes raw input and collects the sorted output.
    pub const COORDINATOR: NodeId = NodeId(0);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_coordinator(self) -> bool {
        self == Self::COORDINATOR
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "N(INVALID)")
        } else {
            write!(f, "N{}", self.0)
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Which of a node's two results an edge carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    Min,
    Max,
}

impl Selector {
    /// Both selectors in the order a node sends them.
    pub const SEND_ORDER: [Selector; 2] = [Selector::Min, Selector::Max];
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Min => write!(f, "min"),
            Selector::Max => write!(f, "max"),
        }
    }
}

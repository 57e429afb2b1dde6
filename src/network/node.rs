//! The compare-exchange node: the only computation in the network.

use crate::network::error::SubstrateResult;
use crate::network::id::{NodeId, Value};
use crate::network::mesh::Link;
use crate::network::topology::NodeSpec;
use serde::Serialize;

/// Order a pair of values as `(min, max)`.
#[inline]
pub fn compare_exchange(a: Value, b: Value) -> (Value, Value) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

/// Record of a node's single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeTrace {
    pub id: NodeId,
    /// Inputs in positional order, not arrival order.
    pub inputs: [Value; 2],
    pub lo: Value,
    pub hi: Value,
}

/// A runtime unit bound to one row of the wiring table.
///
/// `execute` consumes the node, so each instance runs its step exactly once.
#[derive(Debug, Clone, Copy)]
pub struct CompareExchangeNode {
    spec: NodeSpec,
}

impl CompareExchangeNode {
    pub fn new(spec: NodeSpec) -> Self {
        Self { spec }
    }

    pub fn id(&self) -> NodeId {
        self.spec.id
    }

    /// Receive both inputs, then send the min and max to their destinations.
    ///
    /// Each input slot is read from its own source link, so the two values
    /// may arrive in either order without changing which one is "first".
    pub fn execute<L: Link + ?Sized>(self, link: &L) -> SubstrateResult<NodeTrace> {
        debug_assert_eq!(link.id(), self.spec.id);

        let [first, second] = self.spec.inputs.sources();
        let a = link.recv(first)?;
        let b = link.recv(second)?;

        let (lo, hi) = compare_exchange(a, b);
        link.send(self.spec.outputs.min_to, lo)?;
        link.send(self.spec.outputs.max_to, hi)?;

        let trace = NodeTrace {
            id: self.spec.id,
            inputs: [a, b],
            lo,
            hi,
        };
        tracing::debug!(
            "{}: ({}, {}) -> min {} to {}, max {} to {}",
            trace.id,
            a,
            b,
            lo,
            self.spec.outputs.min_to,
            hi,
            self.spec.outputs.max_to
        );
        Ok(trace)
    }
}

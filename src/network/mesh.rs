//! Point-to-point message substrate between nodes.
//!
//! Every ordered `(source, destination)` pair gets its own unbounded
//! crossbeam channel, so delivery is FIFO per pair and sends never block.
//! A node sending to itself goes through its own loopback channel, which
//! buffers until the node gets round to receiving.
//!
//! Each worker owns its [`Endpoint`] outright. When a worker exits, its
//! senders drop with it, and any peer still waiting on that link sees
//! [`SubstrateError::PeerDisconnected`] once the buffered values are
//! drained, rather than blocking forever.

use crate::network::error::{SubstrateError, SubstrateResult};
use crate::network::id::{NodeId, Value};
use crossbeam_channel::{unbounded, Receiver, Sender};

/// One value in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub from: NodeId,
    pub value: Value,
}

/// A node's view of the substrate.
#[cfg_attr(test, mockall::automock)]
pub trait Link {
    /// Identity of the node that owns this link.
    fn id(&self) -> NodeId;

    /// Hand `value` to the substrate for delivery to `to`. Never blocks.
    fn send(&self, to: NodeId, value: Value) -> SubstrateResult<()>;

    /// Block until the next value from `from` arrives.
    fn recv(&self, from: NodeId) -> SubstrateResult<Value>;
}

/// Channel ends owned by a single node.
pub struct Endpoint {
    id: NodeId,
    /// Indexed by destination.
    outbound: Vec<Sender<Message>>,
    /// Indexed by source.
    inbound: Vec<Receiver<Message>>,
}

impl Endpoint {
    /// Number of peers this endpoint can reach, itself included.
    pub fn peers(&self) -> usize {
        self.outbound.len()
    }
}

impl Link for Endpoint {
    fn id(&self) -> NodeId {
        self.id
    }

    fn send(&self, to: NodeId, value: Value) -> SubstrateResult<()> {
        let tx = self.outbound.get(to.index()).ok_or(SubstrateError::UnknownPeer {
            from: self.id,
            to,
        })?;
        tracing::trace!("{} -> {}: {}", self.id, to, value);
        tx.send(Message {
            from: self.id,
            value,
        })
        .map_err(|_| SubstrateError::SendFailed { from: self.id, to })
    }

    fn recv(&self, from: NodeId) -> SubstrateResult<Value> {
        let rx = self.inbound.get(from.index()).ok_or(SubstrateError::UnknownPeer {
            from,
            to: self.id,
        })?;
        let msg = rx.recv().map_err(|_| SubstrateError::PeerDisconnected {
            at: self.id,
            from,
        })?;
        debug_assert_eq!(msg.from, from);
        tracing::trace!("{} <- {}: {}", self.id, from, msg.value);
        Ok(msg.value)
    }
}

/// Builds fully connected meshes of endpoints.
pub struct Mesh;

impl Mesh {
    /// Create one endpoint per node id in `0..nodes`, with a dedicated channel
    /// for every ordered pair (self-pairs included).
    pub fn build(nodes: usize) -> Vec<Endpoint> {
        let mut senders: Vec<Vec<Sender<Message>>> =
            (0..nodes).map(|_| Vec::with_capacity(nodes)).collect();
        let mut receivers: Vec<Vec<Receiver<Message>>> =
            (0..nodes).map(|_| Vec::with_capacity(nodes)).collect();

        for from in 0..nodes {
            for to in 0..nodes {
                let (tx, rx) = unbounded();
                senders[from].push(tx);
                receivers[to].push(rx);
            }
        }

        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(id, (outbound, inbound))| Endpoint {
                id: NodeId(id as u32),
                outbound,
                inbound,
            })
            .collect()
    }
}

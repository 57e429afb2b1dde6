//! Input distribution and output collection, layered on node 0.

use crate::network::error::{SubstrateError, SubstrateResult};
use crate::network::id::{NodeId, Value};
use crate::network::mesh::Link;
use crate::network::node::{CompareExchangeNode, NodeTrace};
use crate::network::topology::Topology;
use crate::output::echo_line;

/// Drives the coordinator's three sequential phases on its own link.
pub struct Coordinator<'a> {
    topology: &'a Topology,
}

impl<'a> Coordinator<'a> {
    pub fn new(topology: &'a Topology) -> Self {
        Self { topology }
    }

    /// Send raw value `i` to entry node `i mod entries`, in index order.
    ///
    /// Entry node 0 is the coordinator itself; those values go through the
    /// loopback link and wait there until [`Coordinator::run`] reaches the
    /// node-0 step.
    pub fn distribute<L: Link + ?Sized>(&self, link: &L, values: &[Value]) -> SubstrateResult<()> {
        debug_assert_eq!(values.len(), self.topology.raw_input_count());
        tracing::info!("Distributing input: {}", echo_line(values));

        for (index, &value) in values.iter().enumerate() {
            link.send(self.topology.entry_for_slot(index), value)?;
        }
        Ok(())
    }

    /// Receive one value per collection entry, in order.
    pub fn collect<L: Link + ?Sized>(&self, link: &L) -> SubstrateResult<Vec<Value>> {
        self.topology
            .collection_order()
            .iter()
            .map(|&from| link.recv(from))
            .collect()
    }

    /// Distribute, run node 0's own compare-exchange step, then collect.
    pub fn run<L: Link + ?Sized>(
        &self,
        link: &L,
        values: &[Value],
    ) -> SubstrateResult<(NodeTrace, Vec<Value>)> {
        self.distribute(link, values)?;

        let spec = self
            .topology
            .spec(NodeId::COORDINATOR)
            .copied()
            .ok_or(SubstrateError::UnknownPeer {
                from: NodeId::COORDINATOR,
                to: NodeId::COORDINATOR,
            })?;
        let trace = CompareExchangeNode::new(spec).execute(link)?;

        let sorted = self.collect(link)?;
        tracing::info!("Collected output: {}", echo_line(&sorted));
        Ok((trace, sorted))
    }
}

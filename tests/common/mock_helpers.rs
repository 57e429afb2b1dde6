//! Link wrappers for fault injection

use oems_rs::network::{Endpoint, Link, Mesh, NodeId, SubstrateError, SubstrateResult, Value};

/// What a [`FaultyLink`] does wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Behave normally
    None,
    /// Every send fails
    FailSends,
    /// Panic on the first receive
    PanicOnRecv,
}

/// An endpoint that can be told to misbehave
pub struct FaultyLink {
    inner: Endpoint,
    fault: Fault,
}

impl Link for FaultyLink {
    fn id(&self) -> NodeId {
        self.inner.id()
    }

    fn send(&self, to: NodeId, value: Value) -> SubstrateResult<()> {
        match self.fault {
            Fault::FailSends => Err(SubstrateError::SendFailed {
                from: self.inner.id(),
                to,
            }),
            _ => self.inner.send(to, value),
        }
    }

    fn recv(&self, from: NodeId) -> SubstrateResult<Value> {
        if self.fault == Fault::PanicOnRecv {
            panic!("injected panic at {}", self.inner.id());
        }
        self.inner.recv(from)
    }
}

/// A mesh where only `target` carries `fault`
pub fn mesh_with_fault(nodes: usize, target: NodeId, fault: Fault) -> Vec<FaultyLink> {
    Mesh::build(nodes)
        .into_iter()
        .map(|inner| {
            let fault = if inner.id() == target { fault } else { Fault::None };
            FaultyLink { inner, fault }
        })
        .collect()
}

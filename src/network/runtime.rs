//! Worker threads for one run of the network.
//!
//! Every node id gets its own OS thread and its own endpoint. Node 0's
//! thread runs the coordinator phases (distribute, compare-exchange,
//! collect) in sequence; the others run a single compare-exchange step and
//! exit.
//!
//! # Failure
//!
//! There is no retry path. A worker that fails or panics drops its
//! endpoint, which turns every downstream receive into
//! [`SubstrateError::PeerDisconnected`], so the whole run winds down
//! instead of hanging. After joining all workers, the runtime reports the
//! root cause in preference to these cascaded disconnects.

use crate::error::{OemsError, Result};
use crate::network::coordinator::Coordinator;
use crate::network::error::{SubstrateError, SubstrateResult};
use crate::network::id::{NodeId, Value};
use crate::network::mesh::{Link, Mesh};
use crate::network::node::{CompareExchangeNode, NodeTrace};
use crate::network::topology::Topology;
use serde::Serialize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Raw input in presentation order.
    pub input: Vec<Value>,
    /// Values in collection order.
    pub sorted: Vec<Value>,
    /// One entry per node, ordered by id.
    pub traces: Vec<NodeTrace>,
    #[serde(skip)]
    pub elapsed: Duration,
}

enum WorkerOutcome {
    Node(NodeTrace),
    Coordinator {
        trace: NodeTrace,
        sorted: Vec<Value>,
    },
}

/// A validated network ready to run any number of times.
pub struct NetworkRuntime {
    topology: Arc<Topology>,
}

impl NetworkRuntime {
    /// Check the worker count against the topology and validate the wiring.
    pub fn new(topology: Topology, workers: usize) -> Result<Self> {
        if workers != topology.len() {
            return Err(OemsError::Configuration(format!(
                "network has {} nodes but {} workers were requested",
                topology.len(),
                workers
            )));
        }
        topology.validate()?;
        Ok(Self {
            topology: Arc::new(topology),
        })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Sort `values` on a fresh in-process mesh.
    pub fn run(&self, values: &[Value]) -> Result<RunReport> {
        self.run_on(Mesh::build(self.topology.len()), values)
    }

    /// Sort `values` using caller-supplied links, one per node id, in id order.
    pub fn run_on<L>(&self, links: Vec<L>, values: &[Value]) -> Result<RunReport>
    where
        L: Link + Send + 'static,
    {
        let expected = self.topology.raw_input_count();
        if values.len() != expected {
            return Err(OemsError::InputSource(format!(
                "expected {} values, got {}",
                expected,
                values.len()
            )));
        }
        if links.len() != self.topology.len() {
            return Err(OemsError::Configuration(format!(
                "network has {} nodes but {} links were supplied",
                self.topology.len(),
                links.len()
            )));
        }
        if let Some((index, link)) = links
            .iter()
            .enumerate()
            .find(|(index, link)| link.id().index() != *index)
        {
            return Err(OemsError::Configuration(format!(
                "link {} is bound to {}",
                index,
                link.id()
            )));
        }

        tracing::info!("Starting run with {} workers", links.len());
        let start = Instant::now();

        let mut handles: Vec<(NodeId, JoinHandle<SubstrateResult<WorkerOutcome>>)> =
            Vec::with_capacity(links.len());
        for link in links {
            let id = link.id();
            let topology = Arc::clone(&self.topology);
            let input = id.is_coordinator().then(|| values.to_vec());

            let handle = thread::Builder::new()
                .name(format!("oems-node-{}", id.0))
                .spawn(move || Self::worker(&topology, &link, input))?;
            handles.push((id, handle));
        }

        let mut traces = Vec::with_capacity(handles.len());
        let mut sorted = None;
        let mut failures = Vec::new();

        for (id, handle) in handles {
            match handle.join() {
                Ok(Ok(WorkerOutcome::Node(trace))) => traces.push(trace),
                Ok(Ok(WorkerOutcome::Coordinator { trace, sorted: out })) => {
                    traces.push(trace);
                    sorted = Some(out);
                }
                Ok(Err(e)) => {
                    if e.is_cascade() {
                        tracing::debug!("Worker {} stopped: {}", id, e);
                    } else {
                        tracing::error!("Worker {} failed: {}", id, e);
                    }
                    failures.push(e);
                }
                Err(_) => {
                    tracing::error!("Worker {} panicked", id);
                    failures.push(SubstrateError::WorkerPanicked(id));
                }
            }
        }

        if let Some(cause) = root_cause(failures) {
            return Err(cause.into());
        }
        let sorted = sorted.ok_or(SubstrateError::WorkerPanicked(NodeId::COORDINATOR))?;

        traces.sort_by_key(|trace| trace.id);
        let elapsed = start.elapsed();
        tracing::info!("Run finished in {:?}", elapsed);

        Ok(RunReport {
            input: values.to_vec(),
            sorted,
            traces,
            elapsed,
        })
    }

    fn worker<L: Link>(
        topology: &Topology,
        link: &L,
        input: Option<Vec<Value>>,
    ) -> SubstrateResult<WorkerOutcome> {
        match input {
            Some(values) => {
                let (trace, sorted) = Coordinator::new(topology).run(link, &values)?;
                Ok(WorkerOutcome::Coordinator { trace, sorted })
            }
            None => {
                let spec = topology.spec(link.id()).copied().ok_or(
                    SubstrateError::UnknownPeer {
                        from: NodeId::COORDINATOR,
                        to: link.id(),
                    },
                )?;
                CompareExchangeNode::new(spec)
                    .execute(link)
                    .map(WorkerOutcome::Node)
            }
        }
    }
}

/// Pick the failure that most likely started a cascade, if any worker failed.
///
/// Ties go to the lowest node id.
fn root_cause(failures: Vec<SubstrateError>) -> Option<SubstrateError> {
    failures.into_iter().fold(None, |best, e| match best {
        Some(b) if b.root_rank() >= e.root_rank() => Some(b),
        _ => Some(e),
    })
}

//! Message-passing sorting network.
//!
//! Nineteen compare-exchange nodes, wired as Batcher's odd-even merge
//! network, sort eight values by exchanging them over point-to-point
//! channels. Node 0 doubles as the coordinator that hands out the raw input
//! and gathers the sorted result.
//!
//! # Architecture
//!
//! ```text
//! [input] ─► Coordinator (N0) ─► entries N0..N3 ─► ... ─► N10, N13, N16..N18
//!                 ▲                                              │
//!                 └──────────── collect in fixed order ◄─────────┘
//! ```
//!
//! # Design
//!
//! - **Table, not branches**: `Topology` is a lookup indexed by `NodeId`;
//!   rewiring is a data change.
//! - **One thread per node**: each worker owns its `Endpoint`; nothing is
//!   shared for mutation.
//! - **FIFO per pair**: one crossbeam channel per ordered `(from, to)` pair.
//!   Inputs are matched positionally by source, never by value.
//! - **No recovery**: any failure aborts the run.

pub mod coordinator;
pub mod error;
pub mod id;
pub mod mesh;
pub mod node;
pub mod runtime;
pub mod topology;

pub use coordinator::Coordinator;
pub use error::{SubstrateError, SubstrateResult, TopologyError, TopologyResult};
pub use id::{NodeId, Selector, Value};
pub use mesh::{Endpoint, Link, Mesh, Message};
pub use node::{compare_exchange, CompareExchangeNode, NodeTrace};
pub use runtime::{NetworkRuntime, RunReport};
pub use topology::{
    InputSpec, NodeSpec, OutputSpec, Topology, COLLECTION_ORDER, ENTRY_NODES, NETWORK_NODES,
    RAW_INPUTS,
};

//! # oems-rs: Message-Passing Odd-Even Merge Sort
//!
//! Sorts exactly eight integers on a fixed network of nineteen concurrent
//! compare-exchange nodes that talk only through point-to-point messages.
//!
//! ## Architecture
//!
//! - **Topology**: the static wiring table of Batcher's odd-even merge network
//! - **Nodes**: one worker thread per node, each receiving two values and
//!   sending their min and max onward
//! - **Coordinator**: node 0, which also distributes the input and collects
//!   the result in a fixed order
//! - **Communication**: crossbeam channels, one per ordered pair of nodes
//!
//! ## Configuration
//!
//! Settings live in `oems.toml` (working directory or the platform config
//! directory). See [`config`] for the fields.
//!
//! ## Example
//!
//! ```no_run
//! use oems_rs::network::{NetworkRuntime, Topology, NETWORK_NODES};
//!
//! fn main() -> oems_rs::Result<()> {
//!     let runtime = NetworkRuntime::new(Topology::odd_even_merge_8(), NETWORK_NODES)?;
//!     let report = runtime.run(&[5, 3, 8, 1, 9, 2, 7, 4])?;
//!     assert_eq!(report.sorted, vec![1, 2, 3, 4, 5, 7, 8, 9]);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod network;
pub mod output;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{OemsError, Result, ResultExt};
pub use input::{read_values, read_values_from_path, InputFormat};
pub use network::{NetworkRuntime, NodeId, RunReport, Topology, Value};
pub use output::{write_report, OutputFormat};

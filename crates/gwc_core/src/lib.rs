//! Core of the graph wave collapse engine.
//!
//! - `graph_wave`: nodes, superpositions, the traversal environment, collapse
//!   orders and the orchestrator
//! - `config`: serialisable run settings
//! - `error`: the crate's error type

pub mod config;
pub mod error;
pub mod graph_wave;

pub use config::CollapseConfig;
pub use error::{GwcError, GwcResult};
pub use graph_wave::{Environment, GraphWaveCollapse};

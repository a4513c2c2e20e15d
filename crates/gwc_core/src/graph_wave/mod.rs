//! Graph wave function collapse.
//!
//! Resolves a discrete state for every node of an arbitrary graph, one node
//! at a time, in an order and by a probability rule supplied by the caller.
//! Later nodes can read the states of nodes resolved before them, so a run
//! propagates constraints the way tile based WFC does, minus the grid.
//!
//! This module provides:
//! - `Node` / `BaseNode`: static node descriptions with a state rule
//! - `Superposition`: weighted candidate resolution with a `FallbackPolicy`
//! - `Environment`: the per-run traversal state and its queries
//! - `CollapseOrder` and the built-in orders
//! - `GraphWaveCollapse`: the orchestrator loop
//! - `validate_graph`: optional structural checks
//!
//! ## Example
//!
//! ```
//! use gwc_core::graph_wave::{
//!     new_node, new_superposition_node, Candidate, Environment, GraphWaveCollapse, GwcRng,
//!     NeighbourhoodOrder, Superposition,
//! };
//!
//! let land = Superposition::new(vec![Candidate::weighted(1.0, "sea"), Candidate::weighted(1.0, "land")]);
//! // The coast takes whatever its first resolved neighbour became.
//! let coast = |_: &mut dyn GwcRng, env: &Environment<&'static str>| {
//!     ["a", "b"].iter().find_map(|id| env.state_of(id).copied())
//! };
//!
//! let nodes = vec![
//!     new_superposition_node("a", land.clone(), ["coast"]),
//!     new_node("coast", coast, ["a", "b"]),
//!     new_superposition_node("b", land, ["coast"]),
//! ];
//!
//! let env = GraphWaveCollapse::new(NeighbourhoodOrder, nodes).run(7);
//! assert_eq!(env.collapsed_len(), 3);
//! ```

pub mod collapse;
pub mod environment;
pub mod ids;
pub mod node;
pub mod order;
pub mod rng;
pub mod superposition;
#[cfg(test)]
mod test_graphs;
pub mod validate;

pub use collapse::{collapse, GraphWaveCollapse};
pub use environment::{Environment, NodeFilter};
pub use ids::IdSetOps;
pub use node::{
    new_node, new_superposition_node, BaseNode, Node, NodeId, NodeIds, NodeProbability,
    NodeRule, NodeState, Nodes, StateFn,
};
pub use order::{
    AscendingOrder, CollapseOrder, DescendingOrder, FixedOrder, NeighbourhoodOrder, OrderFn,
    OrderKind, RandomOrder,
};
pub use rng::{GwcRng, StdRandom};
pub use superposition::{Candidate, FallbackPolicy, Superposition};
pub use validate::{validate_graph, Symmetry};

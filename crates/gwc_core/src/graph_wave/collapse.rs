//! Orchestrator for graph wave collapse runs.
//!
//! Each iteration asks the collapse order for the next node id, stops if
//! that id doesn't name a node, and otherwise makes it current, resolves it
//! against the environment as it stands, and records its state and rank.
//! "No next node" is the only way a run ends. A custom order that keeps
//! returning a node without the run making progress never terminates; the
//! built-in orders always do on a finite graph.

use std::rc::Rc;

use tracing::{debug, trace};

use super::environment::Environment;
use super::node::Nodes;
use super::order::CollapseOrder;
use super::rng::{GwcRng, StdRandom};
use super::superposition::FallbackPolicy;
use crate::config::CollapseConfig;
use crate::error::GwcResult;

/// A reusable collapse setup: a node list, a collapse order and the run's
/// fallback policy.
///
/// # Example
///
/// ```
/// use gwc_core::graph_wave::{
///     new_superposition_node, AscendingOrder, Candidate, GraphWaveCollapse, Superposition,
/// };
///
/// let grass = Superposition::new(vec![Candidate::weighted(3.0, "grass"), Candidate::weighted(1.0, "rock")]);
/// let nodes = vec![
///     new_superposition_node("a", grass.clone(), ["b"]),
///     new_superposition_node("b", grass, ["a"]),
/// ];
///
/// let sim = GraphWaveCollapse::new(AscendingOrder, nodes);
/// let env = sim.run(42);
/// assert_eq!(env.collapsed(), ["a".to_string(), "b".to_string()]);
/// assert!(env.state_of("a").is_some());
/// ```
pub struct GraphWaveCollapse<S> {
    order: Box<dyn CollapseOrder<S>>,
    nodes: Nodes<S>,
    fallback: FallbackPolicy,
}

impl<S> GraphWaveCollapse<S> {
    /// Create a collapse over `nodes` driven by `order`.
    pub fn new(order: impl CollapseOrder<S> + 'static, nodes: Nodes<S>) -> Self {
        Self::with_boxed_order(Box::new(order), nodes)
    }

    /// Create a collapse from an already boxed order.
    pub fn with_boxed_order(order: Box<dyn CollapseOrder<S>>, nodes: Nodes<S>) -> Self {
        Self {
            order,
            nodes,
            fallback: FallbackPolicy::default(),
        }
    }

    /// Create a collapse from a config. Fixed orders are validated against
    /// `nodes`.
    pub fn from_config(config: &CollapseConfig, nodes: Nodes<S>) -> GwcResult<Self> {
        let order = config.order.build(&nodes)?;
        Ok(Self::with_boxed_order(order, nodes).with_fallback(config.fallback))
    }

    /// Set the fallback policy for superpositions that don't pin their own.
    pub fn with_fallback(mut self, policy: FallbackPolicy) -> Self {
        self.fallback = policy;
        self
    }

    /// The run's fallback policy.
    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback
    }

    /// The node list every run starts from.
    pub fn nodes(&self) -> &Nodes<S> {
        &self.nodes
    }

    /// Run to completion on a fresh environment using `rng`.
    pub fn collapse(&self, rng: &mut dyn GwcRng) -> Environment<S> {
        let env = Environment::new(self.nodes.clone()).with_fallback(self.fallback);
        drive(rng, self.order.as_ref(), env)
    }

    /// Run to completion with a `StdRandom` seeded from `seed`.
    pub fn run(&self, seed: u64) -> Environment<S> {
        debug!(seed, "seeding graph wave collapse");
        let mut rng = StdRandom::from_seed(seed);
        self.collapse(&mut rng)
    }
}

/// Run `order` over `nodes` to completion with the default fallback policy.
pub fn collapse<S>(
    rng: &mut dyn GwcRng,
    order: &dyn CollapseOrder<S>,
    nodes: Nodes<S>,
) -> Environment<S> {
    drive(rng, order, Environment::new(nodes))
}

fn drive<S>(
    rng: &mut dyn GwcRng,
    order: &dyn CollapseOrder<S>,
    mut env: Environment<S>,
) -> Environment<S> {
    debug!(
        nodes = env.len(),
        fallback = ?env.fallback_policy(),
        "starting graph wave collapse"
    );

    while let Some(next) = order.next(rng, &env) {
        let Some(node) = env.node(&next).map(Rc::clone) else {
            debug!(id = %next, "collapse order returned an unknown node, stopping");
            break;
        };

        env.set_current(next.clone());
        let state = node.collapse(rng, &env);
        let rank = env.record(next, state);
        trace!(id = node.id(), rank, "collapsed node");
    }

    debug!(
        collapsed = env.collapsed_len(),
        nodes = env.len(),
        "graph wave collapse finished"
    );
    env
}

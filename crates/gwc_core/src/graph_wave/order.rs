//! Collapse orders: which node resolves next.
//!
//! An order reads the environment and returns the id of the next node to
//! collapse, or `None` when it has nothing left. Orders never mutate the
//! environment and draw randomness only from the supplied `GwcRng`.
//!
//! - `RandomOrder`: any unresolved node
//! - `NeighbourhoodOrder`: an unresolved neighbour of the current node,
//!   falling back to `RandomOrder` once the streak runs dry
//! - `AscendingOrder` / `DescendingOrder`: input order, forwards or backwards
//! - `FixedOrder`: a precomputed id sequence

use std::collections::HashSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::environment::Environment;
use super::node::{Node, NodeId, NodeIds};
use super::rng::GwcRng;
use crate::error::{GwcError, GwcResult};

/// Strategy choosing the next node to collapse.
pub trait CollapseOrder<S> {
    /// The id of the next node, or `None` when the order is done.
    fn next(&self, rng: &mut dyn GwcRng, env: &Environment<S>) -> Option<NodeId>;
}

/// Adapts a plain function or closure into a `CollapseOrder`.
pub struct OrderFn<F>(pub F);

impl<S, F> CollapseOrder<S> for OrderFn<F>
where
    F: Fn(&mut dyn GwcRng, &Environment<S>) -> Option<NodeId>,
{
    fn next(&self, rng: &mut dyn GwcRng, env: &Environment<S>) -> Option<NodeId> {
        (self.0)(rng, env)
    }
}

/// Collapses the nodes in totally random order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrder;

impl<S> CollapseOrder<S> for RandomOrder {
    fn next(&self, rng: &mut dyn GwcRng, env: &Environment<S>) -> Option<NodeId> {
        rng.perm(env.len())
            .into_iter()
            .filter_map(|idx| env.to_id(idx))
            .find(|id| !env.is_collapsed(id))
            .map(str::to_owned)
    }
}

/// Collapses a random node, then keeps going with random unresolved
/// neighbours of the latest node until there are none, then jumps to a new
/// random node.
///
/// Neighbour ids that don't name a node are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighbourhoodOrder;

impl<S> CollapseOrder<S> for NeighbourhoodOrder {
    fn next(&self, rng: &mut dyn GwcRng, env: &Environment<S>) -> Option<NodeId> {
        if let Some(current) = env.current() {
            let neighbours = env.neighbours_of(current);
            let streak = rng
                .perm(neighbours.len())
                .into_iter()
                .map(|idx| &neighbours[idx])
                .find(|id| env.contains(id) && !env.is_collapsed(id));
            if let Some(id) = streak {
                return Some(id.clone());
            }
        }
        RandomOrder.next(rng, env)
    }
}

/// Collapses the nodes in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct AscendingOrder;

impl<S> CollapseOrder<S> for AscendingOrder {
    fn next(&self, _rng: &mut dyn GwcRng, env: &Environment<S>) -> Option<NodeId> {
        if env.collapsed_len() < env.len() {
            return env.to_id(env.collapsed_len()).map(str::to_owned);
        }
        None
    }
}

/// Collapses the nodes in reverse input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescendingOrder;

impl<S> CollapseOrder<S> for DescendingOrder {
    fn next(&self, _rng: &mut dyn GwcRng, env: &Environment<S>) -> Option<NodeId> {
        if env.collapsed_len() < env.len() {
            let idx = env.len() - env.collapsed_len() - 1;
            return env.to_id(idx).map(str::to_owned);
        }
        None
    }
}

/// Collapses the nodes in a precomputed order.
///
/// The order must cover exactly the node set. `FixedOrder::new` trusts the
/// caller and panics if the order runs out while nodes remain;
/// `FixedOrder::validated` checks up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedOrder {
    order: NodeIds,
}

impl FixedOrder {
    /// Wrap an order without checking it.
    pub fn new<I>(order: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        Self {
            order: order.into_iter().map(Into::into).collect(),
        }
    }

    /// Wrap an order after checking it is a permutation of the node ids.
    pub fn validated<S, I>(order: I, nodes: &[Rc<dyn Node<S>>]) -> GwcResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        let fixed = Self::new(order);
        let known: HashSet<&str> = nodes.iter().map(|node| node.id()).collect();

        let mut seen = HashSet::new();
        for id in &fixed.order {
            if !known.contains(id.as_str()) {
                return Err(GwcError::InvalidFixedOrder(format!("unknown node id '{id}'")));
            }
            if !seen.insert(id.as_str()) {
                return Err(GwcError::InvalidFixedOrder(format!("node id '{id}' listed twice")));
            }
        }
        if fixed.order.len() != nodes.len() {
            return Err(GwcError::InvalidFixedOrder(format!(
                "order lists {} ids for {} nodes",
                fixed.order.len(),
                nodes.len()
            )));
        }
        Ok(fixed)
    }

    /// The wrapped order.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }
}

impl<S> CollapseOrder<S> for FixedOrder {
    fn next(&self, _rng: &mut dyn GwcRng, env: &Environment<S>) -> Option<NodeId> {
        let rank = env.collapsed_len();
        if rank >= env.len() {
            return None;
        }
        match self.order.get(rank) {
            Some(id) => Some(id.clone()),
            None => panic!(
                "fixed collapse order exhausted at rank {rank}: it lists {} ids for {} nodes",
                self.order.len(),
                env.len()
            ),
        }
    }
}

/// Serialisable choice of built-in order, used by `CollapseConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// `RandomOrder`
    Random,
    /// `NeighbourhoodOrder`
    #[serde(alias = "random_streak")]
    Neighbourhood,
    /// `AscendingOrder`
    #[default]
    Ascending,
    /// `DescendingOrder`
    Descending,
    /// `FixedOrder` over the listed ids
    Fixed(NodeIds),
}

impl OrderKind {
    /// Build the strategy for the given node set. Fixed orders are validated.
    pub fn build<S>(&self, nodes: &[Rc<dyn Node<S>>]) -> GwcResult<Box<dyn CollapseOrder<S>>> {
        let order: Box<dyn CollapseOrder<S>> = match self {
            OrderKind::Random => Box::new(RandomOrder),
            OrderKind::Neighbourhood => Box::new(NeighbourhoodOrder),
            OrderKind::Ascending => Box::new(AscendingOrder),
            OrderKind::Descending => Box::new(DescendingOrder),
            OrderKind::Fixed(order) => Box::new(FixedOrder::validated(order.clone(), nodes)?),
        };
        Ok(order)
    }
}

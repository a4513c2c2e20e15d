//! Node trait and the base node implementation.
//!
//! A node is a static description: an id, an ordered neighbour list, and a
//! rule that produces its state when the orchestrator collapses it. Nodes
//! never change after construction; their resolved state lives in the
//! `Environment`.

use std::fmt;
use std::rc::Rc;

use super::environment::Environment;
use super::rng::GwcRng;
use super::superposition::Superposition;

/// Opaque node identifier.
pub type NodeId = String;

/// Ordered list of node identifiers.
pub type NodeIds = Vec<NodeId>;

/// Relative weight of one candidate state. Not required to sum to 1.
pub type NodeProbability = f64;

/// Resolved state of a node. `None` is the nil state.
pub type NodeState<S> = Option<S>;

/// A fixed state rule: draws from the run's random source and reads the
/// environment, including states of nodes resolved earlier in the run.
pub type StateFn<S> = Rc<dyn Fn(&mut dyn GwcRng, &Environment<S>) -> NodeState<S>>;

/// The node repository of a run, in input order.
pub type Nodes<S> = Vec<Rc<dyn Node<S>>>;

/// The core Node trait.
pub trait Node<S> {
    /// Identifier of this node.
    fn id(&self) -> &str;

    /// Declared neighbours. Adjacency is directional: only this list is
    /// consulted when asking whether another node is a neighbour of this one.
    fn neighbours(&self) -> &[NodeId];

    /// Produce this node's state from the run's random source and the
    /// current environment snapshot.
    fn collapse(&self, rng: &mut dyn GwcRng, env: &Environment<S>) -> NodeState<S>;
}

/// How a `BaseNode` produces its state.
pub enum NodeRule<S> {
    /// Always collapses into the nil state.
    Nil,
    /// Delegates to a fixed state rule.
    State(StateFn<S>),
    /// Resolves a weighted superposition.
    Superposition(Superposition<S>),
}

impl<S> Clone for NodeRule<S> {
    fn clone(&self) -> Self {
        match self {
            NodeRule::Nil => NodeRule::Nil,
            NodeRule::State(f) => NodeRule::State(Rc::clone(f)),
            NodeRule::Superposition(sp) => NodeRule::Superposition(sp.clone()),
        }
    }
}

impl<S> fmt::Debug for NodeRule<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRule::Nil => write!(f, "Nil"),
            NodeRule::State(_) => write!(f, "State(..)"),
            NodeRule::Superposition(sp) => write!(f, "Superposition({} candidates)", sp.len()),
        }
    }
}

/// General purpose node backed by a `NodeRule`.
///
/// Can be used directly or as a base for a more concrete node type with its
/// own `Node::collapse`.
#[derive(Clone, Debug)]
pub struct BaseNode<S> {
    id: NodeId,
    neighbours: NodeIds,
    rule: NodeRule<S>,
}

impl<S> BaseNode<S> {
    /// Create a node with an explicit rule.
    pub fn new<I>(id: impl Into<NodeId>, rule: NodeRule<S>, neighbours: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        Self {
            id: id.into(),
            neighbours: neighbours.into_iter().map(Into::into).collect(),
            rule,
        }
    }

    /// Create a node that always collapses into nil.
    pub fn nil<I>(id: impl Into<NodeId>, neighbours: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        Self::new(id, NodeRule::Nil, neighbours)
    }

    /// The rule this node collapses with.
    pub fn rule(&self) -> &NodeRule<S> {
        &self.rule
    }
}

impl<S> Node<S> for BaseNode<S> {
    fn id(&self) -> &str {
        &self.id
    }

    fn neighbours(&self) -> &[NodeId] {
        &self.neighbours
    }

    fn collapse(&self, rng: &mut dyn GwcRng, env: &Environment<S>) -> NodeState<S> {
        match &self.rule {
            NodeRule::Nil => None,
            NodeRule::State(rule) => rule(rng, env),
            NodeRule::Superposition(superposition) => superposition.resolve(rng, env),
        }
    }
}

/// Builds a node from the provided state rule and neighbours.
pub fn new_node<S, F, I>(id: impl Into<NodeId>, rule: F, neighbours: I) -> Rc<dyn Node<S>>
where
    S: 'static,
    F: Fn(&mut dyn GwcRng, &Environment<S>) -> NodeState<S> + 'static,
    I: IntoIterator,
    I::Item: Into<NodeId>,
{
    Rc::new(BaseNode::new(id, NodeRule::State(Rc::new(rule)), neighbours))
}

/// Builds a node from the provided superposition and neighbours.
pub fn new_superposition_node<S, I>(
    id: impl Into<NodeId>,
    superposition: Superposition<S>,
    neighbours: I,
) -> Rc<dyn Node<S>>
where
    S: 'static,
    I: IntoIterator,
    I::Item: Into<NodeId>,
{
    Rc::new(BaseNode::new(
        id,
        NodeRule::Superposition(superposition),
        neighbours,
    ))
}

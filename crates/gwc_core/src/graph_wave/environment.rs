//! Traversal environment for one collapse run.
//!
//! The environment holds the fixed graph plus everything that changes while
//! the orchestrator runs: the current node, the resolution rank of every
//! collapsed node, and the resolved states. Orders, superpositions and state
//! rules only ever see it through a shared reference.
//!
//! Resolution bookkeeping is split into two structures: `ranks` answers
//! membership and rank lookups, `collapsed` holds ids in rank order. Both
//! only grow through `record`, which keeps ranks dense (`0..n`).
//!
//! Unknown ids never fail: they have no neighbours, no state and no rank.

use std::collections::HashMap;
use std::rc::Rc;

use super::ids::IdSetOps;
use super::node::{Node, NodeId, NodeIds, NodeState, Nodes};
use super::superposition::FallbackPolicy;

/// Selector for `Environment::filter_nodes`.
pub enum NodeFilter<'f, S> {
    /// An explicit id list, returned verbatim.
    ByIds(NodeIds),
    /// A predicate over `(id, state)` evaluated against every node in input
    /// order. Unresolved and nil nodes both present `None`.
    ByPredicate(&'f dyn Fn(&str, Option<&S>) -> bool),
}

impl<'f, S> NodeFilter<'f, S> {
    /// Filter by an explicit id list.
    pub fn ids<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        NodeFilter::ByIds(ids.into_iter().map(Into::into).collect())
    }
}

/// Mutable session state of a collapse run.
pub struct Environment<S> {
    nodes: Nodes<S>,
    /// id -> position in `nodes`; the last node wins on duplicate ids.
    index: HashMap<NodeId, usize>,
    current: Option<NodeId>,
    /// Collapsed ids in rank order.
    collapsed: NodeIds,
    /// id -> rank.
    ranks: HashMap<NodeId, usize>,
    states: HashMap<NodeId, NodeState<S>>,
    fallback: FallbackPolicy,
}

impl<S> Environment<S> {
    /// Create a fresh environment with nothing resolved.
    ///
    /// `current` starts at the first node, if any.
    pub fn new(nodes: Nodes<S>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id().to_owned(), idx))
            .collect();
        let current = nodes.first().map(|node| node.id().to_owned());

        Self {
            nodes,
            index,
            current,
            collapsed: NodeIds::new(),
            ranks: HashMap::new(),
            states: HashMap::new(),
            fallback: FallbackPolicy::default(),
        }
    }

    /// Set the run's fallback policy, used by superpositions without an
    /// override.
    pub fn with_fallback(mut self, policy: FallbackPolicy) -> Self {
        self.fallback = policy;
        self
    }

    /// The run's fallback policy.
    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback
    }

    /// All nodes in input order.
    pub fn nodes(&self) -> &[Rc<dyn Node<S>>] {
        &self.nodes
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for an empty graph.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Rc<dyn Node<S>>> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// True if `id` names a node in the graph.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Neighbours declared by `id`; empty for unknown ids.
    pub fn neighbours_of(&self, id: &str) -> &[NodeId] {
        match self.node(id) {
            Some(node) => node.neighbours(),
            None => &[],
        }
    }

    /// The most recently resolved node (the first node before any resolution).
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Id of the node at `idx` in input order.
    pub fn to_id(&self, idx: usize) -> Option<&str> {
        self.nodes.get(idx).map(|node| node.id())
    }

    /// Position of `id` in input order (first occurrence).
    pub fn to_index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id() == id)
    }

    /// One state per node in input order; `None` for unresolved or nil.
    pub fn states(&self) -> Vec<NodeState<S>>
    where
        S: Clone,
    {
        self.nodes
            .iter()
            .map(|node| self.state_of(node.id()).cloned())
            .collect()
    }

    /// Resolved state of `id`. `None` when unresolved, unknown or nil.
    pub fn state_of(&self, id: &str) -> Option<&S> {
        self.states.get(id).and_then(Option::as_ref)
    }

    /// Collapsed ids in rank order (index 0 resolved first).
    pub fn collapsed(&self) -> &[NodeId] {
        &self.collapsed
    }

    /// Collapsed nodes in rank order.
    pub fn collapsed_nodes(&self) -> Vec<Rc<dyn Node<S>>> {
        self.collapsed
            .iter()
            .filter_map(|id| self.node(id).map(Rc::clone))
            .collect()
    }

    /// Number of nodes resolved so far.
    pub fn collapsed_len(&self) -> usize {
        self.collapsed.len()
    }

    /// Rank at which `id` was resolved.
    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.ranks.get(id).copied()
    }

    /// True once `id` has been resolved.
    pub fn is_collapsed(&self, id: &str) -> bool {
        self.ranks.contains_key(id)
    }

    /// True if `other` is a declared neighbour of the current node.
    pub fn is_neighbour(&self, other: &str) -> bool {
        self.current
            .as_deref()
            .is_some_and(|current| self.is_neighbour_of(current, other))
    }

    /// True if `other` appears in `id`'s neighbour list.
    pub fn is_neighbour_of(&self, id: &str, other: &str) -> bool {
        self.neighbours_of(id).iter().any(|n| n == other)
    }

    /// True if `other` is reachable from the current node within `depth` hops.
    pub fn is_within_range(&self, other: &str, depth: u32) -> bool {
        self.current
            .as_deref()
            .is_some_and(|current| self.is_within_range_of(current, other, depth))
    }

    /// True if `b` is reachable from `a` within `depth` hops.
    ///
    /// The origin is not seeded as known, so `a` itself counts when a cycle
    /// leads back to it within `depth`.
    pub fn is_within_range_of(&self, a: &str, b: &str, depth: u32) -> bool {
        let mut ids = NodeIds::new();
        self.aggregate_neighbours(&mut ids, a, depth);
        ids.iter().any(|id| id == b)
    }

    /// Nodes within `depth` hops of the current node, current excluded.
    /// Empty when there is no current node.
    pub fn nodes_within_range_excl(&self, depth: u32) -> NodeIds {
        match self.current.as_deref() {
            Some(current) => self.nodes_within_range_of_excl(current, depth),
            None => NodeIds::new(),
        }
    }

    /// Nodes within `depth` hops of the current node, current included first.
    /// Empty when there is no current node.
    pub fn nodes_within_range_incl(&self, depth: u32) -> NodeIds {
        match self.current.as_deref() {
            Some(current) => self.nodes_within_range_of_incl(current, depth),
            None => NodeIds::new(),
        }
    }

    /// The inclusive result minus its first element (the origin).
    pub fn nodes_within_range_of_excl(&self, id: &str, depth: u32) -> NodeIds {
        let mut ids = self.nodes_within_range_of_incl(id, depth);
        ids.remove(0);
        ids
    }

    /// `id` followed by every node within `depth` hops, each once, in
    /// discovery order.
    pub fn nodes_within_range_of_incl(&self, id: &str, depth: u32) -> NodeIds {
        let mut ids = vec![id.to_owned()];
        self.aggregate_neighbours(&mut ids, id, depth);
        ids
    }

    /// Breadth-first expansion from `origin`, appending newly discovered ids
    /// to `ids`. Each hop only expands the previous hop's new ids, so
    /// already-known ids are never revisited.
    fn aggregate_neighbours(&self, ids: &mut NodeIds, origin: &str, depth: u32) {
        let mut frontier = vec![origin.to_owned()];

        for _ in 0..depth {
            let mut discovered = NodeIds::new();
            for id in &frontier {
                for n in self.neighbours_of(id) {
                    if !ids.contains(n) && !discovered.contains(n) {
                        discovered.push(n.clone());
                    }
                }
            }
            if discovered.is_empty() {
                break;
            }
            ids.extend(discovered.iter().cloned());
            frontier = discovered;
        }
    }

    /// Ids selected by `filter`.
    pub fn filter_nodes(&self, filter: &NodeFilter<'_, S>) -> NodeIds {
        match filter {
            NodeFilter::ByIds(ids) => ids.clone(),
            NodeFilter::ByPredicate(predicate) => self
                .nodes
                .iter()
                .map(|node| node.id())
                .filter(|id| predicate(*id, self.state_of(*id)))
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Intersection of every filter's result, folded left to right.
    /// Empty when no filters are given.
    pub fn filter_nodes_and(&self, filters: &[NodeFilter<'_, S>]) -> NodeIds {
        self.fold_filters(filters, |acc, next| acc.and(next))
    }

    /// Union of every filter's result, folded left to right.
    /// Empty when no filters are given.
    pub fn filter_nodes_or(&self, filters: &[NodeFilter<'_, S>]) -> NodeIds {
        self.fold_filters(filters, |acc, next| acc.or(next))
    }

    fn fold_filters(
        &self,
        filters: &[NodeFilter<'_, S>],
        combine: impl Fn(&[NodeId], &[NodeId]) -> NodeIds,
    ) -> NodeIds {
        let mut iter = filters.iter();
        let Some(first) = iter.next() else {
            return NodeIds::new();
        };
        let mut filtered = self.filter_nodes(first);
        for filter in iter {
            filtered = combine(&filtered, &self.filter_nodes(filter));
        }
        filtered
    }

    /// Mark `id` as the node being resolved.
    pub(crate) fn set_current(&mut self, id: NodeId) {
        self.current = Some(id);
    }

    /// Record the resolved state of `id` and give it the next rank.
    /// Returns the assigned rank. Re-recording a collapsed id only replaces
    /// its state.
    pub(crate) fn record(&mut self, id: NodeId, state: NodeState<S>) -> usize {
        if let Some(&rank) = self.ranks.get(&id) {
            self.states.insert(id, state);
            return rank;
        }
        let rank = self.collapsed.len();
        self.ranks.insert(id.clone(), rank);
        self.collapsed.push(id.clone());
        self.states.insert(id, state);
        rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_wave::test_graphs::default_test_nodes;
    use crate::graph_wave::Superposition;

    fn ids(xs: &[&str]) -> NodeIds {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn default_env() -> Environment<&'static str> {
        Environment::new(default_test_nodes(Superposition::empty()))
    }

    #[test]
    fn test_methods() {
        let mut env = default_env();
        for id in ["6", "5", "4", "3", "2", "1", "0"] {
            env.record(id.to_string(), None);
        }

        assert_eq!(env.to_id(0), Some("0"));
        assert_eq!(env.to_id(3), Some("3"));
        assert_eq!(env.to_id(7), None);

        assert_eq!(env.to_index("0"), Some(0));
        assert_eq!(env.to_index("3"), Some(3));
        assert_eq!(env.to_index("7"), None);

        assert_eq!(env.states(), vec![None; 7]);
        assert_eq!(env.collapsed(), ids(&["6", "5", "4", "3", "2", "1", "0"]).as_slice());
        assert_eq!(env.rank_of("6"), Some(0));
        assert_eq!(env.rank_of("0"), Some(6));

        let collapsed_ids: NodeIds = env
            .collapsed_nodes()
            .iter()
            .map(|n| n.id().to_string())
            .collect();
        assert_eq!(collapsed_ids, ids(&["6", "5", "4", "3", "2", "1", "0"]));
    }

    #[test]
    fn test_new_environment() {
        let empty: Environment<&str> = Environment::new(Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.current(), None);
        assert!(empty.collapsed().is_empty());

        let filled = default_env();
        assert_eq!(filled.len(), 7);
        assert_eq!(filled.current(), Some("0"));
        assert_eq!(filled.collapsed_len(), 0);
    }

    #[test]
    fn test_record_keeps_ranks_dense() {
        let mut env = default_env();
        assert_eq!(env.record("3".into(), Some("x")), 0);
        assert_eq!(env.record("1".into(), None), 1);
        assert_eq!(env.record("3".into(), Some("y")), 0);
        assert_eq!(env.collapsed_len(), 2);
        assert_eq!(env.state_of("3"), Some(&"y"));
        assert_eq!(env.state_of("1"), None);
        assert!(env.is_collapsed("1"));
        assert!(!env.is_collapsed("2"));
    }

    #[test]
    fn test_is_neighbour() {
        let mut env = default_env();
        env.set_current("5".into());

        assert!(env.is_neighbour("3"));
        assert!(env.is_neighbour("4"));
        for other in ["0", "1", "2", "6"] {
            assert!(!env.is_neighbour(other), "{} is not a neighbour of 5", other);
        }
    }

    #[test]
    fn test_is_neighbour_is_directional() {
        use crate::graph_wave::node::BaseNode;

        let nodes: Nodes<&str> = vec![
            Rc::new(BaseNode::<&str>::nil("a", ["b"])),
            Rc::new(BaseNode::<&str>::nil("b", Vec::<NodeId>::new())),
        ];
        let env = Environment::new(nodes);
        assert!(env.is_neighbour_of("a", "b"));
        assert!(!env.is_neighbour_of("b", "a"));
        assert!(!env.is_neighbour_of("missing", "a"));
    }

    #[test]
    fn test_is_within_range() {
        let mut env = default_env();
        env.set_current("6".into());

        let within = [("4", 1), ("4", 2), ("5", 2), ("3", 3), ("2", 2), ("1", 3), ("0", 3)];
        for (other, depth) in within {
            assert!(env.is_within_range(other, depth), "{} within {}", other, depth);
        }

        let outside = [("4", 0), ("5", 1), ("3", 2), ("2", 1), ("1", 2), ("0", 2)];
        for (other, depth) in outside {
            assert!(!env.is_within_range(other, depth), "{} not within {}", other, depth);
        }
    }

    #[test]
    fn test_origin_reachable_through_cycle() {
        let env = default_env();
        assert!(!env.is_within_range_of("6", "6", 1));
        assert!(env.is_within_range_of("6", "6", 2));
    }

    #[test]
    fn test_nodes_within_range() {
        let mut env = default_env();
        env.set_current("6".into());

        assert_eq!(env.nodes_within_range_incl(1), ids(&["6", "4"]));
        assert_eq!(env.nodes_within_range_incl(2), ids(&["6", "4", "2", "5"]));
        assert_eq!(env.nodes_within_range_excl(3), ids(&["4", "2", "5", "0", "1", "3"]));

        assert_eq!(env.nodes_within_range_of_incl("3", 1), ids(&["3", "2", "5"]));
        assert_eq!(
            env.nodes_within_range_of_incl("3", 2),
            ids(&["3", "2", "5", "0", "1", "4"])
        );
        assert_eq!(
            env.nodes_within_range_of_excl("3", 3),
            ids(&["2", "5", "0", "1", "4", "6"])
        );

        assert_eq!(env.nodes_within_range_of_incl("2", 1), ids(&["2", "0", "1", "3", "4"]));
        assert_eq!(
            env.nodes_within_range_of_incl("2", 2),
            ids(&["2", "0", "1", "3", "4", "5", "6"])
        );
        assert_eq!(
            env.nodes_within_range_of_excl("2", 3),
            ids(&["0", "1", "3", "4", "5", "6"])
        );
    }

    #[test]
    fn test_range_edges() {
        let env = default_env();
        assert_eq!(env.nodes_within_range_of_incl("2", 0), ids(&["2"]));
        assert!(env.nodes_within_range_of_excl("2", 0).is_empty());
        assert_eq!(env.nodes_within_range_of_incl("missing", 3), ids(&["missing"]));
        assert!(!env.is_within_range_of("missing", "2", 3));

        let empty: Environment<&str> = Environment::new(Vec::new());
        assert!(empty.nodes_within_range_incl(2).is_empty());
        assert!(!empty.is_within_range("0", 2));
    }

    #[test]
    fn test_filter_nodes() {
        let env = default_env();
        let low = |id: &str, _: Option<&&'static str>| id == "0" || id == "1" || id == "2";

        let by_ids = env.filter_nodes(&NodeFilter::ids(["1", "2", "3"]));
        let by_other_ids = env.filter_nodes(&NodeFilter::ids(["4", "5", "6"]));
        let filtered = env.filter_nodes(&NodeFilter::ByPredicate(&low));

        assert_eq!(by_ids, ids(&["1", "2", "3"]));
        assert_eq!(by_other_ids, ids(&["4", "5", "6"]));
        assert_eq!(filtered, ids(&["0", "1", "2"]));

        let and = env.filter_nodes_and(&[
            NodeFilter::ids(["1", "2", "3"]),
            NodeFilter::ByPredicate(&low),
        ]);
        let or = env.filter_nodes_or(&[
            NodeFilter::ids(["4", "5", "6"]),
            NodeFilter::ByPredicate(&low),
        ]);
        let and_self = env.filter_nodes_and(&[
            NodeFilter::ByPredicate(&low),
            NodeFilter::ByPredicate(&low),
        ]);
        let or_self = env.filter_nodes_or(&[
            NodeFilter::ByPredicate(&low),
            NodeFilter::ByPredicate(&low),
        ]);

        assert_eq!(and, ids(&["1", "2"]));
        assert_eq!(or, ids(&["4", "5", "6", "0", "1", "2"]));
        assert_eq!(and_self, filtered);
        assert_eq!(or_self, filtered);
        assert!(env.filter_nodes_and(&[]).is_empty());
    }

    #[test]
    fn test_filter_by_state() {
        let mut env = default_env();
        env.record("4".into(), Some("water"));
        env.record("5".into(), Some("sand"));
        env.record("6".into(), None);

        let is_water = |_: &str, state: Option<&&'static str>| state == Some(&"water");
        let unresolved_or_nil = |_: &str, state: Option<&&'static str>| state.is_none();

        assert_eq!(env.filter_nodes(&NodeFilter::ByPredicate(&is_water)), ids(&["4"]));
        assert_eq!(
            env.filter_nodes(&NodeFilter::ByPredicate(&unresolved_or_nil)),
            ids(&["0", "1", "2", "3", "6"])
        );
    }
}

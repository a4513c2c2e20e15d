//! Optional structural checks on a node list before running it.
//!
//! The orchestrator accepts any node list. `validate_graph` is for callers
//! who want duplicate ids, dangling neighbour ids, or one-way edges
//! rejected up front instead of silently tolerated.

use std::collections::HashMap;
use std::rc::Rc;

use super::node::Node;
use crate::error::{GwcError, GwcResult};

/// Whether adjacency must be mutual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Symmetry {
    /// Neighbour lists are one-way; `a -> b` says nothing about `b -> a`.
    #[default]
    Directional,
    /// Every listed neighbour must list the node back.
    Required,
}

/// Check ids are unique and every neighbour id names a node, plus mutual
/// adjacency when `symmetry` is `Required`. Reports the first problem found,
/// walking nodes and their neighbours in input order.
pub fn validate_graph<S>(nodes: &[Rc<dyn Node<S>>], symmetry: Symmetry) -> GwcResult<()> {
    let mut by_id: HashMap<&str, &Rc<dyn Node<S>>> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        if by_id.insert(node.id(), node).is_some() {
            return Err(GwcError::DuplicateNode(node.id().to_owned()));
        }
    }

    for node in nodes {
        for neighbour in node.neighbours() {
            let Some(other) = by_id.get(neighbour.as_str()) else {
                return Err(GwcError::UnknownNeighbour {
                    node: node.id().to_owned(),
                    neighbour: neighbour.clone(),
                });
            };

            if symmetry == Symmetry::Required
                && !other.neighbours().iter().any(|back| back == node.id())
            {
                return Err(GwcError::AsymmetricEdge {
                    from: node.id().to_owned(),
                    to: neighbour.clone(),
                });
            }
        }
    }

    Ok(())
}

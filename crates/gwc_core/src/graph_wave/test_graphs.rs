//! Shared graphs for unit tests.

use super::node::{new_superposition_node, Nodes};
use super::superposition::Superposition;

/// The graph has the following form:
///
/// ```text
///     6
///     |
///     4 - 5
///     |   |
/// 1 - 2 - 3
///     |
///     0
/// ```
pub(crate) fn default_test_nodes<S: 'static>(superposition: Superposition<S>) -> Nodes<S> {
    vec![
        new_superposition_node("0", superposition.clone(), ["2"]),
        new_superposition_node("1", superposition.clone(), ["2"]),
        new_superposition_node("2", superposition.clone(), ["0", "1", "3", "4"]),
        new_superposition_node("3", superposition.clone(), ["2", "5"]),
        new_superposition_node("4", superposition.clone(), ["2", "5", "6"]),
        new_superposition_node("5", superposition.clone(), ["4", "3"]),
        new_superposition_node("6", superposition, ["4"]),
    ]
}

/// `0 - 1 - 2 - 3`
pub(crate) fn linear_nodes<S: 'static>(superposition: Superposition<S>) -> Nodes<S> {
    vec![
        new_superposition_node("0", superposition.clone(), vec!["1"]),
        new_superposition_node("1", superposition.clone(), vec!["0", "2"]),
        new_superposition_node("2", superposition.clone(), vec!["1", "3"]),
        new_superposition_node("3", superposition, vec!["2"]),
    ]
}

//! Set-style combinators over ordered id lists.

use super::node::{NodeId, NodeIds};

/// Logical AND / OR / XOR over id lists, preserving input order.
pub trait IdSetOps {
    /// Ids of `self` that also appear in `other`, in `self`'s order.
    /// A match is emitted once per pairing, so duplicates in either list
    /// are multiplied; dedupe upstream if that matters.
    fn and(&self, other: &[NodeId]) -> NodeIds;

    /// All of `self`, then each id of `other` not already collected.
    fn or(&self, other: &[NodeId]) -> NodeIds;

    /// Ids of `self` missing from `other`, then ids of `other` missing from `self`.
    fn xor(&self, other: &[NodeId]) -> NodeIds;
}

impl IdSetOps for [NodeId] {
    fn and(&self, other: &[NodeId]) -> NodeIds {
        let mut xs = NodeIds::new();
        for a in self {
            for b in other {
                if a == b {
                    xs.push(a.clone());
                }
            }
        }
        xs
    }

    fn or(&self, other: &[NodeId]) -> NodeIds {
        let mut xs = self.to_vec();
        for b in other {
            if !xs.contains(b) {
                xs.push(b.clone());
            }
        }
        xs
    }

    fn xor(&self, other: &[NodeId]) -> NodeIds {
        let left = self.iter().filter(|a| !other.contains(a));
        let right = other.iter().filter(|b| !self.contains(b));
        left.chain(right).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(xs: &[&str]) -> NodeIds {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_and_or_xor() {
        let a = ids(&["0", "1", "2", "3"]);
        let b = ids(&["2", "3", "4", "5"]);

        assert_eq!(a.and(&b), ids(&["2", "3"]));
        assert_eq!(a.or(&b), ids(&["0", "1", "2", "3", "4", "5"]));
        assert_eq!(a.xor(&b), ids(&["0", "1", "4", "5"]));
    }

    #[test]
    fn test_and_duplicates_once_per_pairing() {
        let a = ids(&["x", "y"]);
        let b = ids(&["x", "x"]);
        assert_eq!(a.and(&b), ids(&["x", "x"]));
    }

    #[test]
    fn test_or_keeps_left_order_and_skips_known() {
        let a = ids(&["4", "5", "6"]);
        let b = ids(&["0", "5", "1"]);
        assert_eq!(a.or(&b), ids(&["4", "5", "6", "0", "1"]));
        assert_eq!(a.or(&a), a);
    }

    #[test]
    fn test_empty_operands() {
        let a = ids(&["a"]);
        let empty = NodeIds::new();
        assert!(a.and(&empty).is_empty());
        assert_eq!(empty.or(&a), a);
        assert_eq!(a.xor(&empty), a);
        assert_eq!(a.xor(&a), empty);
    }
}

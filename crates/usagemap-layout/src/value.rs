//! Weight functions deciding how much area each leaf receives.

use crate::tree::TreeNode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Assigns a weight to a leaf. Internal nodes weigh the sum of their leaves.
pub trait Weigher {
    /// Weight of `node`; must be finite and non-negative.
    fn weight(&self, node: &TreeNode) -> f64;
}

impl<F> Weigher for F
where
    F: Fn(&TreeNode) -> f64,
{
    fn weight(&self, node: &TreeNode) -> f64 {
        self(node)
    }
}

/// Weigh by recorded seconds.
#[must_use]
pub fn by_size(node: &TreeNode) -> f64 {
    node.size().unwrap_or(0) as f64
}

/// Weigh every leaf equally.
#[must_use]
pub const fn by_count(_node: &TreeNode) -> f64 {
    1.0
}

/// The two weightings offered by the value selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueMode {
    /// Area proportional to time spent.
    #[default]
    Size,
    /// Area proportional to number of entries.
    Count,
}

impl ValueMode {
    /// Map a selector value: `"size"` is [`ValueMode::Size`], anything else counts.
    #[must_use]
    pub fn from_selector(value: &str) -> Self {
        if value == "size" {
            Self::Size
        } else {
            Self::Count
        }
    }

    /// Selector value for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Count => "count",
        }
    }
}

impl fmt::Display for ValueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Weigher for ValueMode {
    fn weight(&self, node: &TreeNode) -> f64 {
        match self {
            Self::Size => by_size(node),
            Self::Count => by_count(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{RawNode, UsageTree};

    fn leaf_tree() -> UsageTree {
        UsageTree::from_raw(&RawNode::branch("root", vec![RawNode::leaf("a", 42)])).unwrap()
    }

    #[test]
    fn test_from_selector() {
        assert_eq!(ValueMode::from_selector("size"), ValueMode::Size);
        assert_eq!(ValueMode::from_selector("count"), ValueMode::Count);
        assert_eq!(ValueMode::from_selector("Size"), ValueMode::Count);
        assert_eq!(ValueMode::from_selector(""), ValueMode::Count);
    }

    #[test]
    fn test_mode_weights() {
        let tree = leaf_tree();
        let a = tree.find_path(&["a"]).unwrap();
        assert_eq!(ValueMode::Size.weight(&tree[a]), 42.0);
        assert_eq!(ValueMode::Count.weight(&tree[a]), 1.0);
    }

    #[test]
    fn test_closure_weigher() {
        let tree = leaf_tree();
        let a = tree.find_path(&["a"]).unwrap();
        let doubled = |n: &TreeNode| by_size(n) * 2.0;
        assert_eq!(doubled.weight(&tree[a]), 84.0);
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(ValueMode::Count.to_string(), "count");
        let mode: ValueMode = serde_json::from_str("\"size\"").unwrap();
        assert_eq!(mode, ValueMode::Size);
    }
}

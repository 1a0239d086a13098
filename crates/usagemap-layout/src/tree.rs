//! Arena-backed usage hierarchy.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. The
//! parent link is a plain index used for lookup only; ownership runs
//! strictly from the arena to its nodes.

use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Index of a node inside a [`UsageTree`] (or the [`TreeBuilder`] that made it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One entity in the usage hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    name: String,
    size: Option<u64>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl TreeNode {
    /// Node name, unique among its siblings.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Seconds of usage. Always present on leaves of a built tree.
    #[must_use]
    pub const fn size(&self) -> Option<u64> {
        self.size
    }

    /// Ordered child ids.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent id, `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// True when the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The hierarchy as it appears on the wire: `{ name, size?, children? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    /// Node name.
    pub name: String,
    /// Seconds of usage (leaves).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Child nodes; `null` and absent both mean "leaf".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,
}

impl RawNode {
    /// A leaf with a size.
    #[must_use]
    pub fn leaf(name: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            size: Some(size),
            children: None,
        }
    }

    /// A group node.
    #[must_use]
    pub fn branch(name: &str, children: Vec<Self>) -> Self {
        Self {
            name: name.to_string(),
            size: None,
            children: Some(children),
        }
    }
}

/// Incremental construction of a [`UsageTree`] with structural checks.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<TreeNode>,
}

impl TreeBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached node.
    pub fn add(&mut self, name: &str, size: Option<u64>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            name: name.to_string(),
            size,
            children: Vec::new(),
            parent: None,
        });
        id
    }

    /// Append `child` to `parent`'s children.
    ///
    /// Fails if `child` already has a parent or if `parent` lies inside
    /// `child`'s subtree.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let child_node = self.get(child)?;
        if child_node.parent.is_some() {
            return Err(TreeError::SharedChild {
                name: child_node.name.clone(),
            });
        }
        self.get(parent)?;

        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(TreeError::Cycle {
                    name: self.nodes[child.0].name.clone(),
                });
            }
            cursor = self.nodes[id.0].parent;
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Finish the tree rooted at `root`.
    ///
    /// Every added node must be reachable from `root`, and every leaf must
    /// carry a size. A childless root without a size is accepted as an empty
    /// day and gets size 0.
    pub fn build(mut self, root: NodeId) -> Result<UsageTree, TreeError> {
        if self.nodes.is_empty() {
            return Err(TreeError::Empty);
        }
        let root_node = self.get(root)?;
        if root_node.parent.is_some() {
            return Err(TreeError::NotARoot {
                name: root_node.name.clone(),
            });
        }

        let mut reached = vec![false; self.nodes.len()];
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            reached[id.0] = true;
            stack.extend(self.nodes[id.0].children.iter().copied());
        }
        if let Some(pos) = reached.iter().position(|r| !r) {
            return Err(TreeError::Detached {
                name: self.nodes[pos].name.clone(),
            });
        }

        if self.nodes[root.0].is_leaf() && self.nodes[root.0].size.is_none() {
            self.nodes[root.0].size = Some(0);
        }
        if let Some(node) = self
            .nodes
            .iter()
            .find(|n| n.is_leaf() && n.size.is_none())
        {
            return Err(TreeError::MissingSize {
                name: node.name.clone(),
            });
        }

        Ok(UsageTree {
            nodes: self.nodes,
            root,
        })
    }

    fn get(&self, id: NodeId) -> Result<&TreeNode, TreeError> {
        self.nodes.get(id.0).ok_or(TreeError::UnknownNode(id.0))
    }
}

/// A validated usage hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
}

impl UsageTree {
    /// Build from the wire representation.
    pub fn from_raw(raw: &RawNode) -> Result<Self, TreeError> {
        let mut builder = TreeBuilder::new();
        let root = builder.add(&raw.name, raw.size);
        let mut pending = vec![(root, raw)];
        while let Some((id, node)) = pending.pop() {
            for child in node.children.iter().flatten() {
                let child_id = builder.add(&child.name, child.size);
                builder.attach(id, child_id)?;
                pending.push((child_id, child));
            }
        }
        builder.build(root)
    }

    /// Decode JSON text.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let raw: RawNode = serde_json::from_str(json)?;
        Self::from_raw(&raw)
    }

    /// Convert back to the wire representation.
    #[must_use]
    pub fn to_raw(&self) -> RawNode {
        self.raw_at(self.root)
    }

    fn raw_at(&self, id: NodeId) -> RawNode {
        let node = &self[id];
        RawNode {
            name: node.name.clone(),
            size: node.size,
            children: if node.is_leaf() {
                None
            } else {
                Some(node.children.iter().map(|&c| self.raw_at(c)).collect())
            },
        }
    }

    /// Root id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a built tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` belongs to this tree.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Node lookup.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(TreeNode::parent)
    }

    /// Child lookup by name.
    #[must_use]
    pub fn child_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.get(parent)?
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c.0].name == name)
    }

    /// Resolve a path of names below the root, e.g. `["chrome", "github"]`.
    #[must_use]
    pub fn find_path(&self, path: &[&str]) -> Option<NodeId> {
        path.iter()
            .try_fold(self.root, |id, name| self.child_named(id, name))
    }

    /// Names from the root down to `id`, inclusive.
    #[must_use]
    pub fn path_names(&self, id: NodeId) -> Vec<&str> {
        let mut names: Vec<&str> = std::iter::successors(Some(id), |&n| self.parent(n))
            .filter_map(|n| self.get(n).map(TreeNode::name))
            .collect();
        names.reverse();
        names
    }

    /// Ids in pre-order (parents before children, siblings in order).
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        order
    }

    /// Leaf ids in pre-order.
    #[must_use]
    pub fn leaves(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| self.nodes[id.0].is_leaf())
            .collect()
    }

    /// Sum of leaf sizes below `id`.
    #[must_use]
    pub fn total_size(&self, id: NodeId) -> u64 {
        match self.get(id) {
            Some(node) if node.is_leaf() => node.size.unwrap_or(0),
            Some(node) => node.children.iter().map(|&c| self.total_size(c)).sum(),
            None => 0,
        }
    }
}

impl Index<NodeId> for UsageTree {
    type Output = TreeNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawNode {
        RawNode::branch(
            "AppUsage",
            vec![
                RawNode::branch(
                    "chrome",
                    vec![RawNode::leaf("github", 600), RawNode::leaf("mail", 120)],
                ),
                RawNode::branch("sublime-text", vec![RawNode::leaf("misc", 300)]),
            ],
        )
    }

    #[test]
    fn test_from_raw_links_parents() {
        let tree = UsageTree::from_raw(&sample()).unwrap();
        assert_eq!(tree.len(), 6);
        let github = tree.find_path(&["chrome", "github"]).unwrap();
        let chrome = tree.find_path(&["chrome"]).unwrap();
        assert_eq!(tree.parent(github), Some(chrome));
        assert_eq!(tree.parent(chrome), Some(tree.root()));
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn test_preorder_keeps_sibling_order() {
        let tree = UsageTree::from_raw(&sample()).unwrap();
        let names: Vec<&str> = tree.preorder().iter().map(|&id| tree[id].name()).collect();
        assert_eq!(
            names,
            ["AppUsage", "chrome", "github", "mail", "sublime-text", "misc"]
        );
        let leaves: Vec<&str> = tree.leaves().iter().map(|&id| tree[id].name()).collect();
        assert_eq!(leaves, ["github", "mail", "misc"]);
    }

    #[test]
    fn test_total_size() {
        let tree = UsageTree::from_raw(&sample()).unwrap();
        assert_eq!(tree.total_size(tree.root()), 1020);
        let chrome = tree.find_path(&["chrome"]).unwrap();
        assert_eq!(tree.total_size(chrome), 720);
    }

    #[test]
    fn test_path_names() {
        let tree = UsageTree::from_raw(&sample()).unwrap();
        let mail = tree.find_path(&["chrome", "mail"]).unwrap();
        assert_eq!(tree.path_names(mail), ["AppUsage", "chrome", "mail"]);
    }

    #[test]
    fn test_json_null_children_is_leaf() {
        let tree = UsageTree::from_json(
            r#"{"name":"AppUsage","children":[{"name":"vim","size":10,"children":null}]}"#,
        )
        .unwrap();
        let vim = tree.find_path(&["vim"]).unwrap();
        assert!(tree[vim].is_leaf());
        assert_eq!(tree[vim].size(), Some(10));
    }

    #[test]
    fn test_missing_leaf_size_is_rejected() {
        let err = UsageTree::from_json(r#"{"name":"root","children":[{"name":"vim"}]}"#)
            .unwrap_err();
        assert!(matches!(err, TreeError::MissingSize { ref name } if name == "vim"));
    }

    #[test]
    fn test_negative_size_is_decode_error() {
        let err = UsageTree::from_json(r#"{"name":"root","children":[{"name":"a","size":-5}]}"#)
            .unwrap_err();
        assert!(matches!(err, TreeError::Decode(_)));
    }

    #[test]
    fn test_empty_day_root_gets_zero_size() {
        let tree = UsageTree::from_json(r#"{"name":"AppUsage","children":null}"#).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[tree.root()].size(), Some(0));
    }

    #[test]
    fn test_builder_rejects_shared_child() {
        let mut b = TreeBuilder::new();
        let root = b.add("root", None);
        let a = b.add("a", None);
        let shared = b.add("shared", Some(1));
        b.attach(root, a).unwrap();
        b.attach(a, shared).unwrap();
        let err = b.attach(root, shared).unwrap_err();
        assert!(matches!(err, TreeError::SharedChild { ref name } if name == "shared"));
    }

    #[test]
    fn test_builder_rejects_cycle() {
        let mut b = TreeBuilder::new();
        let a = b.add("a", None);
        let c = b.add("c", None);
        b.attach(a, c).unwrap();
        let err = b.attach(c, a).unwrap_err();
        assert!(matches!(err, TreeError::Cycle { .. }));
        let err = b.attach(a, a).unwrap_err();
        assert!(matches!(err, TreeError::Cycle { .. }));
    }

    #[test]
    fn test_builder_rejects_detached_node() {
        let mut b = TreeBuilder::new();
        let root = b.add("root", None);
        let leaf = b.add("leaf", Some(3));
        b.add("stray", Some(1));
        b.attach(root, leaf).unwrap();
        let err = b.build(root).unwrap_err();
        assert!(matches!(err, TreeError::Detached { ref name } if name == "stray"));
    }

    #[test]
    fn test_builder_rejects_non_root() {
        let mut b = TreeBuilder::new();
        let root = b.add("root", None);
        let leaf = b.add("leaf", Some(3));
        b.attach(root, leaf).unwrap();
        assert!(matches!(b.build(leaf), Err(TreeError::NotARoot { .. })));
    }

    #[test]
    fn test_builder_unknown_and_empty() {
        assert!(matches!(TreeBuilder::new().build(NodeId(0)), Err(TreeError::Empty)));
        let mut b = TreeBuilder::new();
        let root = b.add("root", None);
        assert!(matches!(
            b.attach(root, NodeId(9)),
            Err(TreeError::UnknownNode(9))
        ));
    }

    #[test]
    fn test_raw_roundtrip_preserves_shape() {
        let raw = sample();
        let tree = UsageTree::from_raw(&raw).unwrap();
        assert_eq!(tree.to_raw(), raw);
    }
}

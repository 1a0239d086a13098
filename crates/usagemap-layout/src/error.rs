//! Error types for usagemap-layout.

use thiserror::Error;

/// Errors raised while building or decoding a usage tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A leaf has no `size`.
    #[error("leaf node '{name}' has no size")]
    MissingSize {
        /// Name of the offending leaf.
        name: String,
    },

    /// A node was attached under a second parent.
    #[error("node '{name}' already has a parent")]
    SharedChild {
        /// Name of the node attached twice.
        name: String,
    },

    /// An attach would make a node its own ancestor.
    #[error("attaching '{name}' would create a cycle")]
    Cycle {
        /// Name of the node closing the cycle.
        name: String,
    },

    /// A node was added to the builder but is not reachable from the root.
    #[error("node '{name}' is not reachable from the root")]
    Detached {
        /// Name of the unreachable node.
        name: String,
    },

    /// The chosen root is itself attached under another node.
    #[error("node '{name}' has a parent and cannot be the root")]
    NotARoot {
        /// Name of the rejected root.
        name: String,
    },

    /// A node id does not belong to this builder or tree.
    #[error("unknown node id {0}")]
    UnknownNode(usize),

    /// The builder holds no nodes.
    #[error("tree is empty")]
    Empty,

    /// JSON input could not be decoded.
    #[error("invalid tree JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors raised while computing a treemap layout.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// A weigher returned a negative or non-finite weight for a leaf.
    #[error("invalid weight {weight} for node '{name}'")]
    InvalidWeight {
        /// Name of the leaf.
        name: String,
        /// The rejected weight.
        weight: f64,
    },

    /// The viewport has a negative or non-finite side.
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_error_messages() {
        let err = TreeError::MissingSize {
            name: "github.com".to_string(),
        };
        assert_eq!(err.to_string(), "leaf node 'github.com' has no size");
        assert_eq!(TreeError::Empty.to_string(), "tree is empty");
    }

    #[test]
    fn test_decode_error_from_serde() {
        let serde_err = serde_json::from_str::<u64>("-1").unwrap_err();
        let err: TreeError = serde_err.into();
        assert!(err.to_string().starts_with("invalid tree JSON"));
    }

    #[test]
    fn test_layout_error_messages() {
        let err = LayoutError::InvalidViewport {
            width: -1.0,
            height: 10.0,
        };
        assert_eq!(err.to_string(), "invalid viewport -1x10");
    }
}

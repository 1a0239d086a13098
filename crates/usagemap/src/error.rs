//! Error types for the usagemap view.

use thiserror::Error;
use usagemap_layout::{LayoutError, TreeError};

/// Errors raised by the zoom controller. The controller state is left
/// untouched whenever one of these is returned.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ZoomError {
    /// The node id is not part of the current tree or layout.
    #[error("unknown node id {0}")]
    UnknownNode(usize),

    /// The clicked node has no parent to zoom to.
    #[error("node '{name}' has no parent")]
    NoParent {
        /// Name of the clicked node.
        name: String,
    },

    /// The focus rectangle has no width or no height.
    #[error("cannot focus '{name}': rectangle is {width}x{height}")]
    DegenerateFocus {
        /// Name of the rejected focus node.
        name: String,
        /// Layout width of the focus.
        width: f64,
        /// Layout height of the focus.
        height: f64,
    },
}

/// Errors raised while loading or validating a [`ViewConfig`](crate::ViewConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized.
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The config file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A value is out of range.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Any error the view facade can surface.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Dataset tree is malformed.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Layout could not be computed.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Zoom request was rejected.
    #[error(transparent)]
    Zoom(#[from] ZoomError),

    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Dataset JSON could not be decoded.
    #[error("invalid dataset JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

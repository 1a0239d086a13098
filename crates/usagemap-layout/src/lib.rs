//! Treemap layout for usagemap.
//!
//! - [`UsageTree`]: arena-backed hierarchy with lookup-only parent links,
//!   decoded from `{ name, size, children }` JSON
//! - [`Weigher`] / [`ValueMode`]: how much area each leaf gets
//! - [`TreemapLayout`]: squarified partition that keeps its row arrangement
//!   across re-weighting (sticky layout)

mod engine;
mod error;
mod squarify;
mod tree;
mod value;

pub use engine::{LayoutMap, TreemapLayout};
pub use error::{LayoutError, TreeError};
pub use squarify::{place_rows, squarify, Axis, Row};
pub use tree::{NodeId, RawNode, TreeBuilder, TreeNode, UsageTree};
pub use value::{by_count, by_size, ValueMode, Weigher};

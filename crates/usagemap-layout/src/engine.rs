//! Treemap layout engine with sticky re-layout.

use crate::error::LayoutError;
use crate::squarify::{place_rows, squarify, Row};
use crate::tree::{NodeId, UsageTree};
use crate::value::Weigher;
use usagemap_core::{Rect, Size};

/// Computed rectangles and weights, indexed by [`NodeId`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutMap {
    rects: Vec<Rect>,
    weights: Vec<f64>,
    viewport: Size,
}

impl LayoutMap {
    /// Rectangle of `id` in layout space.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<Rect> {
        self.rects.get(id.index()).copied()
    }

    /// Weight of `id` (sum of leaf weights for groups).
    #[must_use]
    pub fn weight(&self, id: NodeId) -> Option<f64> {
        self.weights.get(id.index()).copied()
    }

    /// Viewport the map was computed for.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Number of entries (one per tree node).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// True before the first layout.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// `(leaf, rect)` pairs in pre-order.
    #[must_use]
    pub fn leaf_rects(&self, tree: &UsageTree) -> Vec<(NodeId, Rect)> {
        tree.leaves()
            .into_iter()
            .filter_map(|id| self.get(id).map(|r| (id, r)))
            .collect()
    }
}

/// Rows stored for one group.
#[derive(Debug, Clone)]
struct Arrangement {
    rows: Vec<Row>,
    /// Children that had no area when the rows were built; their slots are
    /// provisional until they gain weight.
    unplaced: Vec<NodeId>,
}

/// Squarified treemap layout that remembers its row arrangement.
///
/// The first [`layout`](Self::layout) of a tree squarifies every group and
/// stores the resulting rows. Later calls on the same tree (for instance with
/// a different [`Weigher`]) replay those rows, so cells keep their neighbours
/// and only grow or shrink. Children that had no area at the time (zero
/// weight, or a collapsed group) are squarified again once they gain weight.
/// Call [`reset`](Self::reset) when the tree changes.
#[derive(Debug, Clone)]
pub struct TreemapLayout {
    sticky: bool,
    arrangement: Vec<Option<Arrangement>>,
    map: LayoutMap,
}

impl TreemapLayout {
    /// Create a sticky layout engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sticky: true,
            arrangement: Vec::new(),
            map: LayoutMap::default(),
        }
    }

    /// Enable or disable arrangement reuse.
    #[must_use]
    pub fn with_sticky(mut self, sticky: bool) -> Self {
        self.sticky = sticky;
        self
    }

    /// Whether arrangement reuse is enabled.
    #[must_use]
    pub const fn is_sticky(&self) -> bool {
        self.sticky
    }

    /// Forget the stored arrangement and the last result.
    pub fn reset(&mut self) {
        self.arrangement.clear();
        self.map = LayoutMap::default();
    }

    /// Result of the last layout.
    #[must_use]
    pub const fn result(&self) -> &LayoutMap {
        &self.map
    }

    /// Stored rows for group `id`, if any.
    #[must_use]
    pub fn arrangement(&self, id: NodeId) -> Option<&[Row]> {
        self.arrangement
            .get(id.index())?
            .as_ref()
            .map(|a| a.rows.as_slice())
    }

    /// Partition a `viewport` among the leaves of `tree` by `weigher`.
    pub fn layout<W>(
        &mut self,
        tree: &UsageTree,
        weigher: &W,
        viewport: Size,
    ) -> Result<&LayoutMap, LayoutError>
    where
        W: Weigher + ?Sized,
    {
        if !viewport.is_valid() {
            return Err(LayoutError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let weights = Self::weigh(tree, weigher)?;

        let reuse = self.sticky && self.arrangement.len() == tree.len();
        if !reuse {
            self.arrangement = vec![None; tree.len()];
        }
        let _span = tracing::debug_span!(
            "treemap_layout",
            nodes = tree.len(),
            width = viewport.width,
            height = viewport.height,
            reuse
        )
        .entered();

        let mut rects = vec![Rect::default(); tree.len()];
        rects[tree.root().index()] = Rect::from_size(viewport);
        let mut placed = Vec::new();

        for id in tree.preorder() {
            let node = &tree[id];
            if node.is_leaf() {
                continue;
            }
            let rect = rects[id.index()];
            let weight_of = |c: NodeId| weights[c.index()];

            let has_area = rect.area() > 0.0;
            let stale = match &self.arrangement[id.index()] {
                Some(stored) => {
                    !covers(&stored.rows, node.children())
                        || (has_area && stored.unplaced.iter().any(|&c| weight_of(c) > 0.0))
                }
                None => true,
            };
            if stale {
                let children: Vec<(NodeId, f64)> =
                    node.children().iter().map(|&c| (c, weight_of(c))).collect();
                let unplaced = children
                    .iter()
                    .filter(|&&(_, w)| w <= 0.0 || !has_area)
                    .map(|&(c, _)| c)
                    .collect();
                self.arrangement[id.index()] = Some(Arrangement {
                    rows: squarify(&children, rect),
                    unplaced,
                });
            }

            if let Some(stored) = &self.arrangement[id.index()] {
                placed.clear();
                place_rows(&stored.rows, rect, weight_of, &mut placed);
                for &(child, child_rect) in &placed {
                    rects[child.index()] = child_rect;
                }
            }
        }

        tracing::debug!(leaves = tree.leaves().len(), "treemap layout computed");
        self.map = LayoutMap {
            rects,
            weights,
            viewport,
        };
        Ok(&self.map)
    }

    /// Bottom-up weights: leaves from the weigher, groups as sums.
    fn weigh<W>(tree: &UsageTree, weigher: &W) -> Result<Vec<f64>, LayoutError>
    where
        W: Weigher + ?Sized,
    {
        let mut weights = vec![0.0; tree.len()];
        for id in tree.preorder().into_iter().rev() {
            let node = &tree[id];
            if node.is_leaf() {
                let weight = weigher.weight(node);
                if !weight.is_finite() || weight < 0.0 {
                    return Err(LayoutError::InvalidWeight {
                        name: node.name().to_string(),
                        weight,
                    });
                }
                weights[id.index()] = weight;
            }
            if let Some(parent) = node.parent() {
                weights[parent.index()] += weights[id.index()];
            }
        }
        Ok(weights)
    }
}

impl Default for TreemapLayout {
    fn default() -> Self {
        Self::new()
    }
}

/// True when `rows` mention exactly the given children.
fn covers(rows: &[Row], children: &[NodeId]) -> bool {
    let count: usize = rows.iter().map(|r| r.children.len()).sum();
    count == children.len()
        && rows
            .iter()
            .flat_map(|r| r.children.iter())
            .all(|c| children.contains(c))
}

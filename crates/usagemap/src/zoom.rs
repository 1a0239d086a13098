//! Zoom state machine.
//!
//! The controller owns the focus node and the two linear scales that map
//! layout space onto the viewport. Zooming never touches the layout; it only
//! retargets the scale domains to the focus rectangle and projects every
//! leaf through them.

use crate::error::ZoomError;
use serde::Serialize;
use std::time::Duration;
use usagemap_core::{LinearScale, Modifiers, Rect, Size};
use usagemap_layout::{LayoutMap, NodeId, UsageTree};

/// Nominal zoom transition length.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(750);

/// Zoom transition length with the slow-motion modifier held.
pub const SLOW_TRANSITION: Duration = Duration::from_millis(7500);

/// Input to [`ZoomController::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomEvent {
    /// A drawn node was clicked.
    NodeClick {
        /// The clicked node (normally a leaf).
        target: NodeId,
        /// Modifiers held during the click.
        modifiers: Modifiers,
    },
    /// Empty space was clicked.
    BackgroundClick {
        /// Modifiers held during the click.
        modifiers: Modifiers,
    },
}

/// Focus node plus the scales derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomState {
    root: NodeId,
    focus: NodeId,
    x_scale: LinearScale,
    y_scale: LinearScale,
}

impl ZoomState {
    /// Overview of `root` on a `viewport`.
    #[must_use]
    pub fn new(root: NodeId, viewport: Size) -> Self {
        Self {
            root,
            focus: root,
            x_scale: LinearScale::new(viewport.width),
            y_scale: LinearScale::new(viewport.height),
        }
    }

    /// The node filling the viewport.
    #[must_use]
    pub const fn focus(&self) -> NodeId {
        self.focus
    }

    /// The tree root.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// True while the root is in focus.
    #[must_use]
    pub fn is_overview(&self) -> bool {
        self.focus == self.root
    }

    /// Horizontal layout-to-pixel scale.
    #[must_use]
    pub const fn x_scale(&self) -> &LinearScale {
        &self.x_scale
    }

    /// Vertical layout-to-pixel scale.
    #[must_use]
    pub const fn y_scale(&self) -> &LinearScale {
        &self.y_scale
    }

    /// Map a layout rectangle into pixels.
    #[must_use]
    pub fn project(&self, rect: &Rect) -> Rect {
        Rect::new(
            self.x_scale.apply(rect.x),
            self.y_scale.apply(rect.y),
            self.x_scale.factor() * rect.dx,
            self.y_scale.factor() * rect.dy,
        )
    }
}

/// Target pixel geometry for one leaf.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellTarget {
    /// Leaf id.
    pub id: NodeId,
    /// Pixel rectangle before the gridline inset.
    pub rect: Rect,
}

/// What the surface must animate to after a zoom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderInstruction {
    /// Focus after the zoom.
    pub focus: NodeId,
    /// One target per leaf, in pre-order.
    pub cells: Vec<CellTarget>,
    /// Transition length.
    pub duration: Duration,
}

/// Owns the [`ZoomState`] and applies [`ZoomEvent`]s to it.
#[derive(Debug, Clone)]
pub struct ZoomController {
    state: ZoomState,
    viewport: Size,
    transition: Duration,
    slow_transition: Duration,
}

impl ZoomController {
    /// Controller in overview for `root`.
    #[must_use]
    pub fn new(root: NodeId, viewport: Size) -> Self {
        Self {
            state: ZoomState::new(root, viewport),
            viewport,
            transition: DEFAULT_TRANSITION,
            slow_transition: SLOW_TRANSITION,
        }
    }

    /// Override the nominal and slow-motion durations.
    #[must_use]
    pub const fn with_durations(mut self, transition: Duration, slow_transition: Duration) -> Self {
        self.transition = transition;
        self.slow_transition = slow_transition;
        self
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &ZoomState {
        &self.state
    }

    /// Current focus.
    #[must_use]
    pub const fn focus(&self) -> NodeId {
        self.state.focus
    }

    /// Viewport the scales map onto.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Back to overview of a (possibly new) tree and viewport.
    pub fn reset(&mut self, root: NodeId, viewport: Size) {
        self.viewport = viewport;
        self.state = ZoomState::new(root, viewport);
    }

    /// Apply a click.
    ///
    /// A node click focuses the node's parent, or the root if that parent is
    /// already focused. A background click focuses the root.
    ///
    /// # Errors
    ///
    /// Returns [`ZoomError`] if the target is unknown, has no parent, or the
    /// new focus has a degenerate rectangle. The state is unchanged then.
    pub fn handle(
        &mut self,
        event: ZoomEvent,
        tree: &UsageTree,
        layout: &LayoutMap,
    ) -> Result<RenderInstruction, ZoomError> {
        let (focus, modifiers) = match event {
            ZoomEvent::NodeClick { target, modifiers } => {
                if !tree.contains(target) || layout.get(target).is_none() {
                    return Err(ZoomError::UnknownNode(target.index()));
                }
                let parent = tree.parent(target).ok_or_else(|| ZoomError::NoParent {
                    name: tree[target].name().to_string(),
                })?;
                let focus = if self.state.focus == parent {
                    tree.root()
                } else {
                    parent
                };
                (focus, modifiers)
            }
            ZoomEvent::BackgroundClick { modifiers } => (tree.root(), modifiers),
        };

        let duration = if modifiers.slow_motion() {
            self.slow_transition
        } else {
            self.transition
        };
        self.zoom_to(focus, duration, tree, layout)
    }

    /// Recompute the scales for the current focus after a re-layout.
    ///
    /// # Errors
    ///
    /// Returns [`ZoomError`] if the focus vanished or became degenerate.
    pub fn refocus(
        &mut self,
        tree: &UsageTree,
        layout: &LayoutMap,
    ) -> Result<RenderInstruction, ZoomError> {
        self.zoom_to(self.state.focus, self.transition, tree, layout)
    }

    /// Project every leaf through the current scales without moving the focus.
    #[must_use]
    pub fn snapshot(&self, tree: &UsageTree, layout: &LayoutMap) -> RenderInstruction {
        RenderInstruction {
            focus: self.state.focus,
            cells: self.targets(tree, layout),
            duration: Duration::ZERO,
        }
    }

    fn zoom_to(
        &mut self,
        focus: NodeId,
        duration: Duration,
        tree: &UsageTree,
        layout: &LayoutMap,
    ) -> Result<RenderInstruction, ZoomError> {
        let rect = layout
            .get(focus)
            .filter(|_| tree.contains(focus))
            .ok_or(ZoomError::UnknownNode(focus.index()))?;
        if rect.is_degenerate() {
            return Err(ZoomError::DegenerateFocus {
                name: tree[focus].name().to_string(),
                width: rect.dx,
                height: rect.dy,
            });
        }

        self.state.focus = focus;
        self.state.root = tree.root();
        self.state.x_scale = LinearScale::new(self.viewport.width).with_domain(rect.x, rect.right());
        self.state.y_scale =
            LinearScale::new(self.viewport.height).with_domain(rect.y, rect.bottom());

        tracing::debug!(
            focus = tree[focus].name(),
            overview = self.state.is_overview(),
            duration_ms = duration.as_millis() as u64,
            "zoom"
        );

        Ok(RenderInstruction {
            focus,
            cells: self.targets(tree, layout),
            duration,
        })
    }

    fn targets(&self, tree: &UsageTree, layout: &LayoutMap) -> Vec<CellTarget> {
        layout
            .leaf_rects(tree)
            .into_iter()
            .map(|(id, rect)| CellTarget {
                id,
                rect: self.state.project(&rect),
            })
            .collect()
    }
}

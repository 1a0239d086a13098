//! Persistent scene of treemap cells.
//!
//! The surface creates one [`Cell`] per leaf on the initial draw and keeps
//! it for the lifetime of the dataset. Zooms only move and resize cells.

use crate::transition::{CellGeometry, Transition};
use crate::zoom::RenderInstruction;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;
use usagemap_core::{format_duration, CategoryPalette, Color, Easing, Point};
use usagemap_layout::{NodeId, UsageTree};

/// Width of the gridline left between neighbouring cells.
pub const GRIDLINE: f64 = 1.0;

/// Measures rendered label width in pixels.
pub trait TextMeasure {
    /// Width of `text`.
    fn measure(&self, text: &str) -> f64;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f64,
{
    fn measure(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Fixed-advance measurement: display columns times `char_width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    char_width: f64,
}

impl MonospaceMeasure {
    /// Measure with `char_width` pixels per column.
    #[must_use]
    pub const fn new(char_width: f64) -> Self {
        Self { char_width }
    }
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self::new(7.0)
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str) -> f64 {
        UnicodeWidthStr::width(text) as f64 * self.char_width
    }
}

/// One drawn leaf: a filled rectangle with a centered label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    /// Leaf id.
    pub id: NodeId,
    /// Label text, `"<name>: <duration>"`.
    pub label: String,
    /// Label width measured at creation.
    pub label_width: f64,
    /// Fill derived from the parent's name.
    pub fill: Color,
    /// Current geometry.
    pub geometry: CellGeometry,
}

impl Cell {
    /// Drawn rectangle width (one gridline narrower than the cell).
    #[must_use]
    pub fn rect_width(&self) -> f64 {
        (self.geometry.rect.dx - GRIDLINE).max(0.0)
    }

    /// Drawn rectangle height.
    #[must_use]
    pub fn rect_height(&self) -> f64 {
        (self.geometry.rect.dy - GRIDLINE).max(0.0)
    }

    /// Label anchor relative to the cell origin.
    #[must_use]
    pub fn label_anchor(&self) -> Point {
        Point::new(self.geometry.rect.dx / 2.0, self.geometry.rect.dy / 2.0)
    }

    /// True when the cell is wider than its label.
    #[must_use]
    pub fn label_visible(&self) -> bool {
        self.geometry.rect.dx > self.label_width
    }

    /// True when `point` falls on the drawn rectangle.
    #[must_use]
    pub fn hit(&self, point: &Point) -> bool {
        let (w, h) = (self.rect_width(), self.rect_height());
        if w <= 0.0 || h <= 0.0 {
            return false;
        }
        let origin = self.geometry.rect.origin();
        point.x >= origin.x && point.x <= origin.x + w && point.y >= origin.y && point.y <= origin.y + h
    }
}

/// Scene graph for one dataset.
#[derive(Debug, Clone)]
pub struct RenderSurface {
    cells: Vec<Cell>,
    index: HashMap<NodeId, usize>,
    transition: Option<Transition>,
    easing: Easing,
}

impl RenderSurface {
    /// Draw the initial scene from `instruction`, measuring every label once.
    #[must_use]
    pub fn build(
        tree: &UsageTree,
        instruction: &RenderInstruction,
        measure: &dyn TextMeasure,
        palette: &CategoryPalette,
    ) -> Self {
        let mut cells = Vec::with_capacity(instruction.cells.len());
        let mut index = HashMap::with_capacity(instruction.cells.len());
        for target in &instruction.cells {
            let node = &tree[target.id];
            let label = format!(
                "{}: {}",
                node.name(),
                format_duration(node.size().unwrap_or(0))
            );
            let label_width = measure.measure(&label);
            let group = tree
                .parent(target.id)
                .map_or_else(|| node.name(), |p| tree[p].name());
            index.insert(target.id, cells.len());
            cells.push(Cell {
                id: target.id,
                fill: palette.color_for(group),
                geometry: CellGeometry::settled(target.rect, label_width),
                label,
                label_width,
            });
        }
        tracing::debug!(cells = cells.len(), "surface built");
        Self {
            cells,
            index,
            transition: None,
            easing: Easing::default(),
        }
    }

    /// Set the easing for later transitions.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Cells in draw order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell for leaf `id`.
    #[must_use]
    pub fn cell(&self, id: NodeId) -> Option<&Cell> {
        self.index.get(&id).map(|&i| &self.cells[i])
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True while a transition runs.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// The running transition.
    #[must_use]
    pub const fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Start animating towards `instruction`, from wherever the cells are now.
    ///
    /// A running transition is dropped. Targets for unknown ids are ignored.
    pub fn apply(&mut self, instruction: &RenderInstruction) {
        let moves: Vec<_> = instruction
            .cells
            .iter()
            .filter_map(|target| {
                let cell = &self.cells[*self.index.get(&target.id)?];
                let to = CellGeometry::settled(target.rect, cell.label_width);
                Some((target.id, cell.geometry, to))
            })
            .collect();

        if self.transition.is_some() {
            tracing::debug!("transition superseded");
        }
        let transition = Transition::new(moves, instruction.duration, self.easing);
        if transition.is_complete() {
            self.write(transition.targets().collect());
            self.transition = None;
        } else {
            self.transition = Some(transition);
        }
    }

    /// Step the running transition; returns true while it is still running.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        transition.advance(dt);
        let frame: Vec<_> = transition.sample().collect();
        let done = transition.is_complete();
        self.write(frame);
        if done {
            self.transition = None;
        }
        !done
    }

    /// Leaf whose drawn rectangle contains `point`; later cells win.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        self.cells
            .iter()
            .rev()
            .find(|cell| cell.hit(&point))
            .map(|cell| cell.id)
    }

    fn write(&mut self, frame: Vec<(NodeId, CellGeometry)>) {
        for (id, geometry) in frame {
            if let Some(&i) = self.index.get(&id) {
                self.cells[i].geometry = geometry;
            }
        }
    }
}

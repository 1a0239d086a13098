//! Time-interpolated cell geometry.

use serde::Serialize;
use std::time::Duration;
use usagemap_core::{Easing, Interpolate, Rect, Tween};
use usagemap_layout::NodeId;

/// Animated state of one cell: its pixel rectangle and label opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellGeometry {
    /// Pixel rectangle before the gridline inset.
    pub rect: Rect,
    /// Label opacity in `[0, 1]`.
    pub label_opacity: f64,
}

impl CellGeometry {
    /// Geometry at `rect` with the label shown only if it fits.
    #[must_use]
    pub fn settled(rect: Rect, label_width: f64) -> Self {
        Self {
            rect,
            label_opacity: if rect.dx > label_width { 1.0 } else { 0.0 },
        }
    }
}

impl Interpolate for CellGeometry {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        Self {
            rect: Rect::interpolate(&from.rect, &to.rect, t),
            label_opacity: f64::interpolate(&from.label_opacity, &to.label_opacity, t),
        }
    }
}

/// One running zoom animation over a set of cells.
#[derive(Debug, Clone)]
pub struct Transition {
    tweens: Vec<(NodeId, Tween<CellGeometry>)>,
    duration: Duration,
    elapsed: Duration,
}

impl Transition {
    /// Animate each cell from its `from` geometry to its `to` geometry.
    #[must_use]
    pub fn new<I>(cells: I, duration: Duration, easing: Easing) -> Self
    where
        I: IntoIterator<Item = (NodeId, CellGeometry, CellGeometry)>,
    {
        let tweens = cells
            .into_iter()
            .map(|(id, from, to)| (id, Tween::new(from, to, duration).with_easing(easing)))
            .collect();
        Self {
            tweens,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Step the clock.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        for (_, tween) in &mut self.tweens {
            tween.advance(dt);
        }
    }

    /// Fraction of the duration elapsed.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            1.0
        } else {
            self.elapsed.as_secs_f64() / self.duration.as_secs_f64()
        }
    }

    /// Whether every cell reached its target.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Total length.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Current geometry of every animated cell.
    pub fn sample(&self) -> impl Iterator<Item = (NodeId, CellGeometry)> + '_ {
        self.tweens.iter().map(|(id, tween)| (*id, tween.value()))
    }

    /// Geometry every cell ends at.
    pub fn targets(&self) -> impl Iterator<Item = (NodeId, CellGeometry)> + '_ {
        self.tweens.iter().map(|(id, tween)| (*id, tween.to))
    }
}

//! Core types for usagemap.
//!
//! This crate provides foundational types used throughout usagemap:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Data-to-pixel mapping: [`LinearScale`]
//! - Colors and the deterministic group palette: [`Color`], [`CategoryPalette`]
//! - Transition timing: [`Easing`], [`Tween`], [`Interpolate`]
//! - Duration labels: [`format_duration`]

mod animation;
mod color;
mod event;
mod format;
mod geometry;
mod scale;

pub use animation::{Easing, Interpolate, Tween};
pub use color::{CategoryPalette, Color, ColorParseError};
pub use event::Modifiers;
pub use format::{format_duration, window_title};
pub use geometry::{Point, Rect, Size};
pub use scale::LinearScale;

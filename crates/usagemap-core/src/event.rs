//! Input modifiers carried by pointer events.

use serde::{Deserialize, Serialize};

/// Keyboard modifiers held during a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Alt / Option key
    pub alt: bool,
    /// Shift key
    pub shift: bool,
    /// Control key
    pub ctrl: bool,
    /// Meta / Command key
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        alt: false,
        shift: false,
        ctrl: false,
        meta: false,
    };

    /// Only alt held.
    pub const ALT: Self = Self {
        alt: true,
        shift: false,
        ctrl: false,
        meta: false,
    };

    /// Slow-motion transitions are requested with alt.
    #[must_use]
    pub const fn slow_motion(&self) -> bool {
        self.alt
    }
}

//! Zoomable treemap of time-usage data.
//!
//! A [`UsageView`] takes one day of usage ([`UsageDataset`]), lays it out as
//! a squarified treemap, and reacts to clicks by zooming into the clicked
//! cell's group with an animated transition.
//!
//! ```
//! use usagemap::{UsageDataset, UsageView, ViewConfig, ViewEvent};
//! use usagemap_core::Modifiers;
//!
//! let dataset = UsageDataset::from_json(
//!     r#"{"usage": {"name": "AppUsage", "children": [
//!         {"name": "chrome", "children": [{"name": "github", "size": 3600}]}
//!     ]}}"#,
//! )?;
//! let mut view = UsageView::new(ViewConfig::default(), &dataset)?;
//!
//! let github = view.tree().find_path(&["chrome", "github"]).unwrap();
//! view.handle(ViewEvent::NodeClick { target: github, modifiers: Modifiers::NONE })?;
//! while view.tick(std::time::Duration::from_millis(16)) {}
//! assert!(!view.zoom_state().is_overview());
//! # Ok::<(), usagemap::ViewError>(())
//! ```

mod config;
mod dataset;
mod error;
mod surface;
mod svg;
mod timeline;
mod transition;
mod view;
mod zoom;

pub use config::ViewConfig;
pub use dataset::{DayCursor, UsageDataset, DAY_SECONDS, FIRST_DAY};
pub use error::{ConfigError, ViewError, ZoomError};
pub use surface::{Cell, MonospaceMeasure, RenderSurface, TextMeasure, GRIDLINE};
pub use timeline::{Interval, IntervalRow, IntervalSet, Timeline};
pub use transition::{CellGeometry, Transition};
pub use view::{UsageView, ViewEvent};
pub use zoom::{
    CellTarget, RenderInstruction, ZoomController, ZoomEvent, ZoomState, DEFAULT_TRANSITION,
    SLOW_TRANSITION,
};

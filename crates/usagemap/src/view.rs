//! Event facade tying layout, zoom and scene together.

use crate::config::ViewConfig;
use crate::dataset::{DayCursor, UsageDataset};
use crate::error::{ViewError, ZoomError};
use crate::surface::{MonospaceMeasure, RenderSurface, TextMeasure};
use crate::timeline::Timeline;
use crate::zoom::{ZoomController, ZoomEvent, ZoomState};
use std::fmt;
use std::time::Duration;
use usagemap_core::{CategoryPalette, Modifiers, Point, Size};
use usagemap_layout::{LayoutMap, NodeId, TreemapLayout, UsageTree, ValueMode};

/// Everything the host can feed into a [`UsageView`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// A cell was clicked.
    NodeClick {
        /// Clicked leaf.
        target: NodeId,
        /// Modifiers held.
        modifiers: Modifiers,
    },
    /// Empty space was clicked.
    BackgroundClick {
        /// Modifiers held.
        modifiers: Modifiers,
    },
    /// The value selector changed; `"size"` or anything else for count.
    ValueModeChanged(String),
    /// A new day was loaded.
    DatasetReloaded(UsageDataset),
}

/// Per-dataset state, rebuilt from scratch on every load.
struct Scene {
    tree: UsageTree,
    engine: TreemapLayout,
    zoom: ZoomController,
    surface: RenderSurface,
    timeline: Timeline,
    title: String,
    cursor: DayCursor,
}

/// One interactive treemap over one day of usage.
pub struct UsageView {
    config: ViewConfig,
    viewport: Size,
    mode: ValueMode,
    palette: CategoryPalette,
    measure: Box<dyn TextMeasure>,
    scene: Scene,
}

impl UsageView {
    /// Lay out `dataset` with labels measured as monospace text.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the config is invalid or the dataset cannot
    /// be laid out.
    pub fn new(config: ViewConfig, dataset: &UsageDataset) -> Result<Self, ViewError> {
        let measure = MonospaceMeasure::new(config.char_width);
        Self::with_measure(config, dataset, Box::new(measure))
    }

    /// Lay out `dataset` with a custom label measure.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the config is invalid or the dataset cannot
    /// be laid out.
    pub fn with_measure(
        config: ViewConfig,
        dataset: &UsageDataset,
        measure: Box<dyn TextMeasure>,
    ) -> Result<Self, ViewError> {
        config.validate()?;
        let viewport = config.viewport();
        let palette = CategoryPalette::category20c();
        let mode = ValueMode::default();
        let scene = build_scene(&config, viewport, mode, measure.as_ref(), &palette, dataset)?;
        Ok(Self {
            config,
            viewport,
            mode,
            palette,
            measure,
            scene,
        })
    }

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the event is rejected. The view is unchanged
    /// in that case.
    pub fn handle(&mut self, event: ViewEvent) -> Result<(), ViewError> {
        match event {
            ViewEvent::NodeClick { target, modifiers } => {
                self.zoom(ZoomEvent::NodeClick { target, modifiers })
            }
            ViewEvent::BackgroundClick { modifiers } => {
                self.zoom(ZoomEvent::BackgroundClick { modifiers })
            }
            ViewEvent::ValueModeChanged(value) => self.set_value_mode(&value),
            ViewEvent::DatasetReloaded(dataset) => self.reload(&dataset),
        }
    }

    /// Dispatch a click at `point` (viewport pixels) as exactly one node or
    /// background click.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the resulting zoom is rejected.
    pub fn click_at(&mut self, point: Point, modifiers: Modifiers) -> Result<(), ViewError> {
        // a lone root cell has no group to drill into
        let event = match self.scene.surface.hit_test(point) {
            Some(target) if self.scene.tree.parent(target).is_some() => {
                ViewEvent::NodeClick { target, modifiers }
            }
            _ => ViewEvent::BackgroundClick { modifiers },
        };
        self.handle(event)
    }

    /// Advance the running transition by `dt`; true while still animating.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.scene.surface.advance(dt)
    }

    /// Re-weight the layout and keep the current focus.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the layout fails; the previous layout and
    /// focus stay in place.
    pub fn set_value_mode(&mut self, value: &str) -> Result<(), ViewError> {
        let mode = ValueMode::from_selector(value);
        let scene = &mut self.scene;
        let mut engine = scene.engine.clone();
        let mut zoom = scene.zoom.clone();
        engine.layout(&scene.tree, &mode, self.viewport)?;

        let layout = engine.result();
        let instruction = match zoom.refocus(&scene.tree, layout) {
            Err(ZoomError::DegenerateFocus { name, .. }) => {
                tracing::debug!(focus = %name, "focus vanished under new weights");
                zoom.handle(
                    ZoomEvent::BackgroundClick {
                        modifiers: Modifiers::NONE,
                    },
                    &scene.tree,
                    layout,
                )?
            }
            other => other?,
        };

        scene.engine = engine;
        scene.zoom = zoom;
        scene.surface.apply(&instruction);
        self.mode = mode;
        tracing::debug!(mode = %mode, "value mode changed");
        Ok(())
    }

    /// Replace the dataset and return to the overview.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the new dataset is malformed; the current one
    /// stays in place.
    pub fn reload(&mut self, dataset: &UsageDataset) -> Result<(), ViewError> {
        let mode = ValueMode::default();
        let scene = build_scene(
            &self.config,
            self.viewport,
            mode,
            self.measure.as_ref(),
            &self.palette,
            dataset,
        )?;
        self.scene = scene;
        self.mode = mode;
        tracing::debug!(date = %dataset.date, "dataset reloaded");
        Ok(())
    }

    fn zoom(&mut self, event: ZoomEvent) -> Result<(), ViewError> {
        let scene = &mut self.scene;
        let instruction = scene
            .zoom
            .handle(event, &scene.tree, scene.engine.result())?;
        scene.surface.apply(&instruction);
        Ok(())
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Drawing area.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Current weighting.
    #[must_use]
    pub const fn value_mode(&self) -> ValueMode {
        self.mode
    }

    /// Current tree.
    #[must_use]
    pub const fn tree(&self) -> &UsageTree {
        &self.scene.tree
    }

    /// Current layout.
    #[must_use]
    pub const fn layout(&self) -> &LayoutMap {
        self.scene.engine.result()
    }

    /// Current zoom state.
    #[must_use]
    pub const fn zoom_state(&self) -> &ZoomState {
        self.scene.zoom.state()
    }

    /// Current scene.
    #[must_use]
    pub const fn surface(&self) -> &RenderSurface {
        &self.scene.surface
    }

    /// Timeline strip.
    #[must_use]
    pub const fn timeline(&self) -> &Timeline {
        &self.scene.timeline
    }

    /// Window title for the loaded day.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.scene.title
    }

    /// Day navigation for the loaded day.
    #[must_use]
    pub const fn cursor(&self) -> DayCursor {
        self.scene.cursor
    }

    /// SVG snapshot of the current frame.
    #[must_use]
    pub fn to_svg(&self) -> String {
        self.scene.surface.to_svg(self.viewport)
    }
}

impl fmt::Debug for UsageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsageView")
            .field("viewport", &self.viewport)
            .field("mode", &self.mode)
            .field("title", &self.scene.title)
            .field("focus", &self.scene.zoom.focus())
            .field("cells", &self.scene.surface.len())
            .finish_non_exhaustive()
    }
}

fn build_scene(
    config: &ViewConfig,
    viewport: Size,
    mode: ValueMode,
    measure: &dyn TextMeasure,
    palette: &CategoryPalette,
    dataset: &UsageDataset,
) -> Result<Scene, ViewError> {
    let _span = tracing::debug_span!("build_scene", date = %dataset.date).entered();
    let tree = dataset.tree()?;
    let mut engine = TreemapLayout::new().with_sticky(config.sticky);
    engine.layout(&tree, &mode, viewport)?;

    let zoom = ZoomController::new(tree.root(), viewport).with_durations(
        Duration::from_millis(config.transition_ms),
        Duration::from_millis(config.slow_transition_ms),
    );
    let surface = RenderSurface::build(
        &tree,
        &zoom.snapshot(&tree, engine.result()),
        measure,
        palette,
    )
    .with_easing(config.easing);

    Ok(Scene {
        tree,
        engine,
        zoom,
        surface,
        timeline: Timeline::new(dataset.intervals.clone(), viewport.width),
        title: dataset.title(),
        cursor: dataset.cursor(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;
    use usagemap_layout::RawNode;

    fn dataset() -> UsageDataset {
        let mut dataset = UsageDataset::new(RawNode::branch(
            "AppUsage",
            vec![
                RawNode::branch(
                    "chrome",
                    vec![RawNode::leaf("github", 5400), RawNode::leaf("mail", 600)],
                ),
                RawNode::branch("vim", vec![RawNode::leaf("notes", 3000)]),
            ],
        ));
        dataset.total = 9000;
        dataset.date = "2014-04-07".to_string();
        dataset
    }

    fn view() -> UsageView {
        UsageView::new(ViewConfig::default(), &dataset()).unwrap()
    }

    #[test]
    fn test_new_view_is_overview() {
        let view = view();
        assert!(view.zoom_state().is_overview());
        assert_eq!(view.viewport(), Size::new(1216.0, 708.0));
        assert_eq!(view.surface().len(), 3);
        assert_eq!(view.title(), "2h 30m  on 2014-04-07 - AppUsage");
        assert_eq!(view.value_mode(), ValueMode::Size);
    }

    #[test]
    fn test_click_at_cell_zooms_to_group() {
        let mut view = view();
        let github = view.tree().find_path(&["chrome", "github"]).unwrap();
        let chrome = view.tree().find_path(&["chrome"]).unwrap();
        let center = view.surface().cell(github).unwrap().geometry.rect.center();

        view.click_at(center, Modifiers::NONE).unwrap();
        assert_eq!(view.zoom_state().focus(), chrome);
        assert!(view.surface().is_animating());
        while view.tick(Duration::from_millis(16)) {}
        assert!(!view.surface().is_animating());
    }

    #[test]
    fn test_click_on_gridline_is_background() {
        let mut view = view();
        let github = view.tree().find_path(&["chrome", "github"]).unwrap();
        view.handle(ViewEvent::NodeClick {
            target: github,
            modifiers: Modifiers::NONE,
        })
        .unwrap();
        assert!(!view.zoom_state().is_overview());

        // the last pixel column is always gridline
        view.click_at(Point::new(1215.5, 10.0), Modifiers::NONE).unwrap();
        assert!(view.zoom_state().is_overview());
    }

    #[test]
    #[traced_test]
    fn test_value_mode_change_keeps_focus() {
        let mut view = view();
        let github = view.tree().find_path(&["chrome", "github"]).unwrap();
        view.handle(ViewEvent::NodeClick {
            target: github,
            modifiers: Modifiers::NONE,
        })
        .unwrap();
        let focus = view.zoom_state().focus();

        view.handle(ViewEvent::ValueModeChanged("count".to_string()))
            .unwrap();
        assert_eq!(view.value_mode(), ValueMode::Count);
        assert_eq!(view.zoom_state().focus(), focus);
        assert!(logs_contain("value mode changed"));
    }

    #[test]
    fn test_mode_change_drops_vanished_focus() {
        let mut dataset = dataset();
        dataset.usage = RawNode::branch(
            "AppUsage",
            vec![
                RawNode::branch("idle", vec![RawNode::leaf("nothing", 0)]),
                RawNode::branch("vim", vec![RawNode::leaf("notes", 3000)]),
            ],
        );
        let mut view = UsageView::new(ViewConfig::default(), &dataset).unwrap();
        view.set_value_mode("count").unwrap();
        let nothing = view.tree().find_path(&["idle", "nothing"]).unwrap();
        view.handle(ViewEvent::NodeClick {
            target: nothing,
            modifiers: Modifiers::NONE,
        })
        .unwrap();
        assert!(!view.zoom_state().is_overview());

        view.set_value_mode("size").unwrap();
        assert!(view.zoom_state().is_overview());
    }

    #[test]
    #[traced_test]
    fn test_reload_resets_state() {
        let mut view = view();
        let github = view.tree().find_path(&["chrome", "github"]).unwrap();
        view.handle(ViewEvent::NodeClick {
            target: github,
            modifiers: Modifiers::ALT,
        })
        .unwrap();
        view.set_value_mode("count").unwrap();

        let mut next = UsageDataset::new(RawNode::branch(
            "AppUsage",
            vec![RawNode::branch("term", vec![RawNode::leaf("ssh", 60)])],
        ));
        next.date = "2014-04-08".to_string();
        view.handle(ViewEvent::DatasetReloaded(next)).unwrap();

        assert!(view.zoom_state().is_overview());
        assert!(!view.surface().is_animating());
        assert_eq!(view.surface().len(), 1);
        assert_eq!(view.value_mode(), ValueMode::Size);
        assert!(logs_contain("dataset reloaded"));
    }

    #[test]
    fn test_click_on_empty_day_is_background() {
        let dataset =
            UsageDataset::from_json(r#"{"usage":{"name":"AppUsage","children":null}}"#).unwrap();
        let mut view = UsageView::new(ViewConfig::default(), &dataset).unwrap();
        assert_eq!(view.surface().len(), 1);
        assert_eq!(
            view.surface().hit_test(Point::new(100.0, 100.0)),
            Some(view.tree().root())
        );

        view.click_at(Point::new(100.0, 100.0), Modifiers::NONE)
            .unwrap();
        assert!(view.zoom_state().is_overview());
        assert_eq!(view.surface().cells()[0].label, "AppUsage: ");
    }

    #[test]
    fn test_failed_mode_change_keeps_layout_and_mode() {
        let mut view = view();
        let github = view.tree().find_path(&["chrome", "github"]).unwrap();
        view.handle(ViewEvent::NodeClick {
            target: github,
            modifiers: Modifiers::NONE,
        })
        .unwrap();
        let layout = view.layout().clone();
        let state = view.zoom_state().clone();

        // a non-finite viewport makes the re-layout fail
        view.viewport = Size::new(f64::NAN, 10.0);
        assert!(matches!(
            view.set_value_mode("count"),
            Err(ViewError::Layout(_))
        ));
        assert_eq!(view.value_mode(), ValueMode::Size);
        assert_eq!(view.layout(), &layout);
        assert_eq!(view.zoom_state(), &state);
    }

    #[test]
    fn test_failed_reload_keeps_current_day() {
        let mut view = view();
        let broken = UsageDataset::new(RawNode::branch(
            "AppUsage",
            vec![RawNode {
                name: "nosize".to_string(),
                size: None,
                children: None,
            }],
        ));
        assert!(matches!(view.reload(&broken), Err(ViewError::Tree(_))));
        assert_eq!(view.surface().len(), 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ViewConfig {
            char_width: -1.0,
            ..ViewConfig::default()
        };
        assert!(matches!(
            UsageView::new(config, &dataset()),
            Err(ViewError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_target_is_error() {
        let mut view = view();
        let err = view
            .handle(ViewEvent::NodeClick {
                target: view.tree().root(),
                modifiers: Modifiers::NONE,
            })
            .unwrap_err();
        assert!(matches!(err, ViewError::Zoom(ZoomError::NoParent { .. })));
    }

    #[test]
    fn test_svg_export_has_every_cell() {
        let view = view();
        let svg = view.to_svg();
        assert_eq!(svg.matches("class=\"cell\"").count(), 3);
        assert!(svg.contains("github: 1h 30m "));
        assert!(format!("{view:?}").starts_with("UsageView"));
    }
}

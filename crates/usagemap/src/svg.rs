//! SVG snapshot of a [`RenderSurface`].

use crate::surface::RenderSurface;
use std::fmt::Write;
use usagemap_core::Size;

impl RenderSurface {
    /// Serialize the current frame as a standalone SVG document.
    ///
    /// Each cell becomes a `g.cell` translated to its origin, holding the
    /// inset rectangle and the centered label with its current opacity.
    #[must_use]
    pub fn to_svg(&self, viewport: Size) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            viewport.width, viewport.height
        );
        out.push_str("<g transform=\"translate(.5,.5)\">\n");
        for cell in self.cells() {
            let rect = cell.geometry.rect;
            let anchor = cell.label_anchor();
            let _ = writeln!(
                out,
                r#"<g class="cell" transform="translate({},{})"><rect width="{}" height="{}" style="fill:{}"/><text x="{}" y="{}" dy=".35em" text-anchor="middle" style="opacity:{}">{}</text></g>"#,
                rect.x,
                rect.y,
                cell.rect_width(),
                cell.rect_height(),
                cell.fill.to_hex(),
                anchor.x,
                anchor.y,
                cell.geometry.label_opacity,
                escape(&cell.label),
            );
        }
        out.push_str("</g>\n</svg>\n");
        out
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MonospaceMeasure;
    use crate::zoom::ZoomController;
    use usagemap_core::CategoryPalette;
    use usagemap_layout::{RawNode, TreemapLayout, UsageTree, ValueMode};

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_svg_document() {
        let tree = UsageTree::from_raw(&RawNode::branch(
            "AppUsage",
            vec![RawNode::branch("term", vec![RawNode::leaf("<ssh>", 90)])],
        ))
        .unwrap();
        let viewport = Size::new(200.0, 100.0);
        let mut engine = TreemapLayout::new();
        engine.layout(&tree, &ValueMode::Size, viewport).unwrap();
        let zoom = ZoomController::new(tree.root(), viewport);
        let surface = RenderSurface::build(
            &tree,
            &zoom.snapshot(&tree, engine.result()),
            &MonospaceMeasure::default(),
            &CategoryPalette::default(),
        );

        let svg = surface.to_svg(viewport);
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"200\" height=\"100\">"));
        assert!(svg.contains("<g class=\"cell\" transform=\"translate(0,0)\">"));
        assert!(svg.contains("<rect width=\"199\" height=\"99\""));
        assert!(svg.contains("&lt;ssh&gt;: 1m 30s"));
        assert!(svg.contains("style=\"opacity:1\""));
        assert_eq!(svg.matches("class=\"cell\"").count(), 1);
        assert!(svg.ends_with("</svg>\n"));
    }
}

//! Paints a [`Scene`] onto a ratatui [`Canvas`].
//!
//! One surface unit maps to one terminal cell. Surface y grows downward while
//! canvas y grows upward, so y is negated on the way in.

use super::styles::ChainStyles;
use crate::layout::Point;
use crate::render::Scene;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::Widget;

/// Chain view widget.
pub struct ChainCanvas<'a> {
    scene: &'a Scene,
    origin: Point,
    styles: ChainStyles,
}

impl<'a> ChainCanvas<'a> {
    /// Show `scene` with `origin` at the top-left cell.
    pub fn new(scene: &'a Scene, origin: Point, styles: ChainStyles) -> Self {
        Self {
            scene,
            origin,
            styles,
        }
    }
}

/// Surface coordinate under a cell of a canvas drawn at `area` with `origin`.
pub fn cell_to_surface(area: Rect, origin: Point, column: u16, row: u16) -> Option<Point> {
    let inside = column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height;
    inside.then(|| {
        Point::new(
            origin.x + f64::from(column - area.x),
            origin.y + f64::from(row - area.y),
        )
    })
}

impl Widget for ChainCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let span_x = (f64::from(area.width) - 1.0).max(1.0);
        let span_y = (f64::from(area.height) - 1.0).max(1.0);
        let Point { x: x0, y: y0 } = self.origin;
        let scene = self.scene;
        let styles = self.styles;

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([x0, x0 + span_x])
            .y_bounds([-(y0 + span_y), -y0])
            .paint(move |ctx| {
                for line in scene.lines() {
                    ctx.draw(&CanvasLine {
                        x1: line.from.x,
                        y1: -line.from.y,
                        x2: line.to.x,
                        y2: -line.to.y,
                        color: styles.edge_color(line.color, line.opacity),
                    });
                }
                ctx.layer();
                for (key, node, position) in scene.positioned_nodes() {
                    let text = format!("{}{}", styles.node_glyph(key), node.label);
                    ctx.print(
                        position.x,
                        -position.y,
                        Span::styled(text, styles.node_style(key)),
                    );
                }
            })
            .render(area, buf);
    }
}

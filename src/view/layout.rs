//! Frame layout: chain canvas above a one-line status bar.

use super::camera::Camera;
use super::canvas::ChainCanvas;
use super::status::status_text;
use super::styles::ChainStyles;
use crate::layout::Viewport;
use crate::render::NodeKey;
use crate::session::Session;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::Paragraph,
    Frame,
};

/// Areas of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameAreas {
    /// Where the chain is painted.
    pub canvas: Rect,
    /// Status bar.
    pub status: Rect,
}

impl FrameAreas {
    /// Split a terminal area.
    pub fn split(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        Self {
            canvas: chunks[0],
            status: chunks[1],
        }
    }

    /// Surface viewport matching the canvas area.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(f64::from(self.canvas.width), f64::from(self.canvas.height))
    }
}

/// Draw one frame and return the areas used.
pub fn render_frame(
    frame: &mut Frame,
    session: &Session,
    camera: &Camera,
    styles: ChainStyles,
    selected: Option<NodeKey>,
) -> FrameAreas {
    let areas = FrameAreas::split(frame.area());
    let origin = camera.origin(session.layout().offset());

    frame.render_widget(
        ChainCanvas::new(session.scene(), origin, styles),
        areas.canvas,
    );

    let text = status_text(session, camera.is_following(), selected);
    let status = Paragraph::new(Line::from(text)).style(styles.status_style(session.desynced()));
    frame.render_widget(status, areas.status);

    areas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bar_takes_the_last_row() {
        let areas = FrameAreas::split(Rect::new(0, 0, 80, 24));
        assert_eq!(areas.canvas, Rect::new(0, 0, 80, 23));
        assert_eq!(areas.status, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn viewport_follows_canvas_size() {
        let areas = FrameAreas::split(Rect::new(0, 0, 100, 30));
        assert_eq!(areas.viewport(), Viewport::new(100.0, 29.0));
    }

    #[test]
    fn tiny_terminal_still_yields_a_viewport() {
        let areas = FrameAreas::split(Rect::new(0, 0, 10, 1));
        assert_eq!(areas.canvas.height, 0);
        assert_eq!(areas.viewport(), Viewport::new(10.0, 1.0));
    }
}

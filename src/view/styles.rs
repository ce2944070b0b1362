//! Colours for edges, nodes and the status line.

use crate::render::{EdgeColor, NodeKey};
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Colours on, regardless of environment.
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Colours off, regardless of environment.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== ChainStyles =====

/// Styling for the chain canvas.
///
/// Each edge family has a base RGB colour; opacity is approximated by scaling it
/// towards black, since terminals have no alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainStyles {
    colors: ColorConfig,
}

impl ChainStyles {
    /// Styles for the given colour configuration.
    pub fn with_color_config(colors: ColorConfig) -> Self {
        Self { colors }
    }

    /// Whether colours are in use.
    pub fn colors_enabled(&self) -> bool {
        self.colors.colors_enabled()
    }

    /// Line colour for an edge at the given opacity.
    pub fn edge_color(&self, edge: EdgeColor, opacity: f64) -> Color {
        if !self.colors.colors_enabled() {
            return Color::Reset;
        }
        let (r, g, b) = match edge {
            EdgeColor::Parent => (170, 170, 170),
            EdgeColor::Vote => (80, 200, 230),
            EdgeColor::Source => (90, 200, 110),
            EdgeColor::Target => (235, 200, 70),
            EdgeColor::Head => (210, 110, 230),
        };
        let scale = |c: u8| (f64::from(c) * opacity.clamp(0.0, 1.0)).round() as u8;
        Color::Rgb(scale(r), scale(g), scale(b))
    }

    /// Glyph drawn at a node's position.
    pub fn node_glyph(&self, key: NodeKey) -> char {
        match key {
            NodeKey::Block(_) => '■',
            NodeKey::Attestation(_) => '•',
            NodeKey::Validator(_) => '○',
        }
    }

    /// Style for a node's glyph and label.
    pub fn node_style(&self, key: NodeKey) -> Style {
        if !self.colors.colors_enabled() {
            return match key {
                NodeKey::Block(_) => Style::default().add_modifier(Modifier::BOLD),
                _ => Style::default(),
            };
        }
        match key {
            NodeKey::Block(_) => Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            NodeKey::Attestation(_) => Style::default().fg(Color::Yellow),
            NodeKey::Validator(_) => Style::default().fg(Color::Cyan),
        }
    }

    /// Style for the status line.
    pub fn status_style(&self, desynced: bool) -> Style {
        match (self.colors.colors_enabled(), desynced) {
            (true, true) => Style::default().fg(Color::White).bg(Color::Red),
            (true, false) => Style::default().fg(Color::Black).bg(Color::Gray),
            (false, _) => Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

impl Default for ChainStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

// ===== Tests =====

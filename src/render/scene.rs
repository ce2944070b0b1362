//! Retained in-memory render surface.

use super::{EdgeColor, NodeKey, RenderSurface};
use crate::layout::Point;
use std::collections::HashMap;

/// Default hit radius in surface units.
pub const DEFAULT_HIT_RADIUS: f64 = 1.0;

/// A node held by the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Short text shown next to the glyph.
    pub label: String,
    /// `None` until the first `set_position`.
    pub position: Option<Point>,
}

/// A line held by the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLine {
    /// Start point.
    pub from: Point,
    /// End point.
    pub to: Point,
    /// Edge family.
    pub color: EdgeColor,
    /// `0.0..=1.0`.
    pub opacity: f64,
}

/// Everything currently drawn, ready to be painted by a front end.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: HashMap<NodeKey, SceneNode>,
    lines: Vec<SceneLine>,
    hit_radius: f64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene with the default hit radius.
    pub fn new() -> Self {
        Self::with_hit_radius(DEFAULT_HIT_RADIUS)
    }

    /// Empty scene. Clicks farther than `radius` (per axis) from every node miss.
    pub fn with_hit_radius(radius: f64) -> Self {
        Self {
            nodes: HashMap::new(),
            lines: Vec::new(),
            hit_radius: radius.abs(),
        }
    }

    /// Look up a node.
    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(&key)
    }

    /// Positioned nodes, sorted by key.
    pub fn positioned_nodes(&self) -> Vec<(NodeKey, &SceneNode, Point)> {
        let mut nodes: Vec<_> = self
            .nodes
            .iter()
            .filter_map(|(key, node)| node.position.map(|p| (*key, node, p)))
            .collect();
        nodes.sort_by_key(|(key, _, _)| *key);
        nodes
    }

    /// Lines in draw order.
    pub fn lines(&self) -> &[SceneLine] {
        &self.lines
    }

    /// Number of nodes, positioned or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl RenderSurface for Scene {
    fn has_node(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    fn create_node(&mut self, key: NodeKey, label: String) {
        self.nodes
            .entry(key)
            .and_modify(|node| node.label.clone_from(&label))
            .or_insert(SceneNode {
                label,
                position: None,
            });
    }

    fn remove_node(&mut self, key: NodeKey) {
        self.nodes.remove(&key);
    }

    fn set_position(&mut self, key: NodeKey, position: Point) {
        if let Some(node) = self.nodes.get_mut(&key) {
            node.position = Some(position);
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, color: EdgeColor, opacity: f64) {
        self.lines.push(SceneLine {
            from,
            to,
            color,
            opacity: opacity.clamp(0.0, 1.0),
        });
    }

    fn clear_lines(&mut self) {
        self.lines.clear();
    }

    fn node_position(&self, key: NodeKey) -> Option<Point> {
        self.nodes.get(&key).and_then(|node| node.position)
    }

    /// Closest node within the hit radius. Ties go to the smallest key.
    fn hit_test(&self, point: Point) -> Option<NodeKey> {
        self.nodes
            .iter()
            .filter_map(|(key, node)| node.position.map(|p| (*key, p)))
            .filter(|(_, p)| {
                (p.x - point.x).abs() <= self.hit_radius && (p.y - point.y).abs() <= self.hit_radius
            })
            .map(|(key, p)| {
                let (dx, dy) = (p.x - point.x, p.y - point.y);
                (key, dx * dx + dy * dy)
            })
            .min_by(|(ka, da), (kb, db)| da.total_cmp(db).then_with(|| ka.cmp(kb)))
            .map(|(key, _)| key)
    }
}

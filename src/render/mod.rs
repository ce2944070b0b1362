//! Render surface abstraction and the relation renderer.
//!
//! The layout engine produces coordinates; this module turns them into nodes and
//! lines on a [`RenderSurface`]. [`Scene`] is the retained in-memory surface the
//! terminal front end paints from.

pub mod relations;
pub mod scene;

pub use relations::{draw_relations, vote_opacity, DrawReport, RelationOptions};
pub use scene::{Scene, SceneLine, SceneNode};

use crate::layout::Point;
use crate::model::{AttestationPtr, BlockPtr, ValidatorIndex};
use std::fmt;

/// Identity of a drawable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    /// A delivered block.
    Block(BlockPtr),
    /// An attestation.
    Attestation(AttestationPtr),
    /// A validator.
    Validator(ValidatorIndex),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Block(ptr) => write!(f, "{ptr}"),
            NodeKey::Attestation(ptr) => write!(f, "{ptr}"),
            NodeKey::Validator(index) => write!(f, "{index}"),
        }
    }
}

/// Edge family. Front ends map each family to a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeColor {
    /// Block to its parent.
    Parent,
    /// Validator to an attestation it voted with.
    Vote,
    /// Attestation to its source checkpoint block.
    Source,
    /// Attestation to its target checkpoint block.
    Target,
    /// Attestation to the block it voted as head.
    Head,
}

/// Something nodes and lines can be drawn on.
///
/// Positions are absolute surface coordinates. Lines are transient and cleared at
/// the start of each redraw; nodes persist until removed.
pub trait RenderSurface {
    /// Whether a node exists for `key`.
    fn has_node(&self, key: NodeKey) -> bool;

    /// Create a node. Replaces the label if it already exists.
    fn create_node(&mut self, key: NodeKey, label: String);

    /// Remove a node if present.
    fn remove_node(&mut self, key: NodeKey);

    /// Move a node. Ignored for unknown keys.
    fn set_position(&mut self, key: NodeKey, position: Point);

    /// Draw a line. `opacity` is in `0.0..=1.0`.
    fn draw_line(&mut self, from: Point, to: Point, color: EdgeColor, opacity: f64);

    /// Remove every line.
    fn clear_lines(&mut self);

    /// Current position of a node.
    fn node_position(&self, key: NodeKey) -> Option<Point>;

    /// The node under `point`, if any.
    fn hit_test(&self, point: Point) -> Option<NodeKey>;
}

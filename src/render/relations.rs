//! Relation renderer: nodes and edges from the world and its layout.
//!
//! Every call is a full redraw. Lines are cleared first, then each node is created
//! on first sight, moved to its current absolute position, and connected to the
//! nodes it relates to. Edges whose far end has no position are skipped.

use super::{EdgeColor, NodeKey, RenderSurface};
use crate::layout::{Layout, Point};
use crate::model::{Attestation, Block, BlockRef};
use crate::world::{Validator, WorldState};

/// Opacity falloff between successive votes of one validator.
const VOTE_FALLOFF: f64 = 0.7;

/// Options for a redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationOptions {
    /// Draw validators and their vote edges.
    pub show_validators: bool,
}

impl Default for RelationOptions {
    fn default() -> Self {
        Self {
            show_validators: true,
        }
    }
}

/// Counts from one redraw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawReport {
    /// Nodes created in this redraw.
    pub nodes_created: usize,
    /// Lines drawn.
    pub lines: usize,
}

/// Opacity of the vote at `rank` (0 = most recent target slot).
pub fn vote_opacity(rank: usize) -> f64 {
    VOTE_FALLOFF.powi(i32::try_from(rank).unwrap_or(i32::MAX))
}

/// Redraw every relation of `world` on `surface` using `layout`'s positions.
pub fn draw_relations<S: RenderSurface>(
    world: &WorldState,
    layout: &Layout,
    surface: &mut S,
    options: RelationOptions,
) -> DrawReport {
    surface.clear_lines();
    let mut report = DrawReport::default();

    let mut blocks: Vec<&Block> = world.blocks().collect();
    blocks.sort_by_key(|b| b.self_ptr());
    for block in blocks {
        draw_block(block, layout, surface, &mut report);
    }

    for attestation in world.attestations() {
        draw_attestation(attestation, layout, surface, &mut report);
    }

    for validator in world.validators().iter() {
        if options.show_validators {
            draw_validator(validator, layout, surface, &mut report);
        } else {
            surface.remove_node(NodeKey::Validator(validator.index()));
        }
    }

    report
}

fn place_node<S: RenderSurface>(
    surface: &mut S,
    key: NodeKey,
    label: impl FnOnce() -> String,
    position: Point,
    report: &mut DrawReport,
) {
    if !surface.has_node(key) {
        surface.create_node(key, label());
        report.nodes_created += 1;
    }
    surface.set_position(key, position);
}

fn line<S: RenderSurface>(
    surface: &mut S,
    from: Point,
    to: Option<Point>,
    color: EdgeColor,
    opacity: f64,
    report: &mut DrawReport,
) {
    if let Some(to) = to {
        surface.draw_line(from, to, color, opacity);
        report.lines += 1;
    }
}

fn draw_block<S: RenderSurface>(
    block: &Block,
    layout: &Layout,
    surface: &mut S,
    report: &mut DrawReport,
) {
    let Some(position) = layout.absolute_block_position(block.self_ptr()) else {
        return;
    };
    let key = NodeKey::Block(block.self_ptr());
    place_node(
        surface,
        key,
        || block.content_hash().short().to_string(),
        position,
        report,
    );

    if !block.parent_ptr().is_root() {
        let parent = layout.absolute_block_position(block.parent_ptr());
        line(surface, position, parent, EdgeColor::Parent, 1.0, report);
    }
}

fn draw_attestation<S: RenderSurface>(
    attestation: &Attestation,
    layout: &Layout,
    surface: &mut S,
    report: &mut DrawReport,
) {
    let Some(position) = layout.absolute_attestation_position(attestation.self_ptr()) else {
        return;
    };
    let key = NodeKey::Attestation(attestation.self_ptr());
    place_node(
        surface,
        key,
        || format!("c{}", attestation.committee_index()),
        position,
        report,
    );

    let resolved_position =
        |r: BlockRef| r.resolved().and_then(|ptr| layout.absolute_block_position(ptr));
    for (reference, color) in [
        (attestation.source(), EdgeColor::Source),
        (attestation.target(), EdgeColor::Target),
        (attestation.head(), EdgeColor::Head),
    ] {
        line(
            surface,
            position,
            resolved_position(reference),
            color,
            1.0,
            report,
        );
    }
}

fn draw_validator<S: RenderSurface>(
    validator: &Validator,
    layout: &Layout,
    surface: &mut S,
    report: &mut DrawReport,
) {
    let Some(position) = layout.validator_position(validator.index()) else {
        return;
    };
    let key = NodeKey::Validator(validator.index());
    place_node(
        surface,
        key,
        || validator.index().get().to_string(),
        position,
        report,
    );

    for (rank, vote) in validator.votes().iter().enumerate() {
        let target = layout.absolute_attestation_position(vote.attestation);
        line(
            surface,
            position,
            target,
            EdgeColor::Vote,
            vote_opacity(rank),
            report,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutParams, Viewport};
    use crate::model::{
        AttestationPtr, AttestationSummary, BlockPtr, BlockSummary, ContentHash, DiffMessage,
        HeadSummary, Slot, ValidatorIndex, VoteSummary,
    };
    use crate::render::Scene;

    fn block(self_ptr: u64, parent: u64, slot: u64) -> BlockSummary {
        BlockSummary {
            self_ptr: BlockPtr::new(self_ptr),
            content_hash: ContentHash::new(format!("0x{self_ptr:04x}")),
            slot: Slot::new(slot),
            parent: BlockPtr::new(parent),
        }
    }

    fn world_with_votes() -> WorldState {
        let mut diff = DiffMessage::empty(0);
        diff.head
            .push(HeadSummary::new(BlockPtr::new(2), Slot::new(2), 2));
        diff.blocks.push(block(1, 0, 1));
        diff.blocks.push(block(2, 1, 2));
        for (ptr, slot, head) in [(10, 1, 1), (11, 2, 2), (12, 2, 2), (13, 3, 99)] {
            diff.attestations.push(AttestationSummary {
                self_ptr: AttestationPtr::new(ptr),
                slot: Slot::new(slot),
                committee_index: 0,
                head: BlockPtr::new(head),
                target: BlockPtr::new(1),
                source: BlockPtr::new(1),
            });
        }
        for att in [10, 11, 12] {
            diff.latest_votes.push(VoteSummary {
                validator_index: ValidatorIndex::new(0),
                attestation_ptr: AttestationPtr::new(att),
            });
        }
        let mut world = WorldState::new();
        world.apply(&diff);
        world
    }

    fn laid_out(world: &WorldState) -> Layout {
        let mut layout = Layout::new(LayoutParams::default(), Viewport::new(80.0, 40.0));
        layout.recompute(world);
        layout
    }

    #[test]
    fn vote_opacity_falls_off_geometrically() {
        assert_eq!(vote_opacity(0), 1.0);
        assert!((vote_opacity(1) - 0.7).abs() < 1e-12);
        assert!((vote_opacity(2) - 0.49).abs() < 1e-12);
    }

    #[test]
    fn draws_every_family_of_edge() {
        let world = world_with_votes();
        let layout = laid_out(&world);
        let mut scene = Scene::new();
        draw_relations(&world, &layout, &mut scene, RelationOptions::default());

        let count = |color| scene.lines().iter().filter(|l| l.color == color).count();
        // Block 2 -> block 1; block 1's parent is the root.
        assert_eq!(count(EdgeColor::Parent), 1);
        // Four attestations, each with resolved source and target.
        assert_eq!(count(EdgeColor::Source), 4);
        assert_eq!(count(EdgeColor::Target), 4);
        // Attestation 13's head never resolved.
        assert_eq!(count(EdgeColor::Head), 3);
        assert_eq!(count(EdgeColor::Vote), 3);
    }

    #[test]
    fn vote_lines_fade_by_rank() {
        let world = world_with_votes();
        let layout = laid_out(&world);
        let mut scene = Scene::new();
        draw_relations(&world, &layout, &mut scene, RelationOptions::default());

        let opacities: Vec<f64> = scene
            .lines()
            .iter()
            .filter(|l| l.color == EdgeColor::Vote)
            .map(|l| l.opacity)
            .collect();
        assert_eq!(opacities.len(), 3);
        assert_eq!(opacities[0], 1.0);
        assert!((opacities[1] - 0.7).abs() < 1e-12);
        assert!((opacities[2] - 0.49).abs() < 1e-12);
    }

    #[test]
    fn redraw_creates_nodes_once_and_replaces_lines() {
        let world = world_with_votes();
        let layout = laid_out(&world);
        let mut scene = Scene::new();

        let first = draw_relations(&world, &layout, &mut scene, RelationOptions::default());
        let second = draw_relations(&world, &layout, &mut scene, RelationOptions::default());

        // 2 blocks, 4 attestations, 2 validators.
        assert_eq!(first.nodes_created, 8);
        assert_eq!(second.nodes_created, 0);
        assert_eq!(first.lines, second.lines);
        assert_eq!(scene.lines().len(), second.lines);
    }

    #[test]
    fn nodes_sit_at_absolute_layout_positions() {
        let world = world_with_votes();
        let layout = laid_out(&world);
        let mut scene = Scene::new();
        draw_relations(&world, &layout, &mut scene, RelationOptions::default());

        let key = NodeKey::Block(BlockPtr::new(2));
        assert_eq!(
            scene.node_position(key),
            layout.absolute_block_position(BlockPtr::new(2))
        );
        assert_eq!(scene.node(key).map(|n| n.label.as_str()), Some("0002"));
    }

    #[test]
    fn hiding_validators_removes_their_nodes_and_votes() {
        let world = world_with_votes();
        let layout = laid_out(&world);
        let mut scene = Scene::new();
        draw_relations(&world, &layout, &mut scene, RelationOptions::default());
        draw_relations(
            &world,
            &layout,
            &mut scene,
            RelationOptions {
                show_validators: false,
            },
        );

        assert!(!scene.has_node(NodeKey::Validator(ValidatorIndex::new(0))));
        assert!(scene.lines().iter().all(|l| l.color != EdgeColor::Vote));
    }
}

//! Layout engine: turns the world state into surface coordinates.
//!
//! Blocks sit on a slot grid (column = slot, row = order within the slot) in a
//! *layer* coordinate space. The layer is shifted by an offset that keeps the head
//! block horizontally centred and on the head row. Attestations fan out below the
//! block they vote for as head. Validators are placed in a fixed grid band that is
//! not affected by the layer offset.
//!
//! [`Layout::recompute`] is a full recompute and is idempotent.

pub mod order;
pub mod params;

pub use order::{assign_slot_orders, SlotOrder};
pub use params::{LayoutParams, Viewport};

use crate::model::{AttestationPtr, BlockPtr, ValidatorIndex};
use crate::world::WorldState;
use std::collections::HashMap;
use tracing::trace;

/// A position on the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: f64,
    /// Vertical coordinate, growing downward.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    pub fn offset_by(self, offset: Point) -> Point {
        Point::new(self.x + offset.x, self.y + offset.y)
    }
}

/// Computed positions for everything on screen.
#[derive(Debug, Clone)]
pub struct Layout {
    params: LayoutParams,
    viewport: Viewport,
    orders: HashMap<BlockPtr, SlotOrder>,
    /// Layer coordinates. Survive recomputes that do not reach the block.
    block_positions: HashMap<BlockPtr, Point>,
    /// Layer coordinates.
    attestation_positions: HashMap<AttestationPtr, Point>,
    /// Absolute coordinates.
    validator_positions: Vec<Point>,
    offset: Point,
}

impl Layout {
    /// Empty layout for the given geometry.
    pub fn new(params: LayoutParams, viewport: Viewport) -> Self {
        Self {
            params,
            viewport,
            orders: HashMap::new(),
            block_positions: HashMap::new(),
            attestation_positions: HashMap::new(),
            validator_positions: Vec::new(),
            offset: Point::default(),
        }
    }

    /// Geometry in use.
    pub fn params(&self) -> LayoutParams {
        self.params
    }

    /// Viewport in use.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Change the viewport. Takes effect on the next [`recompute`](Self::recompute).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Recompute every position from `world`.
    ///
    /// Does nothing until a head summary has arrived.
    pub fn recompute(&mut self, world: &WorldState) {
        let Some(head) = world.head().copied() else {
            return;
        };

        self.orders = assign_slot_orders(world.tree(), head.head_block);
        for (ptr, cell) in &self.orders {
            self.block_positions.insert(*ptr, self.cell_position(*cell));
        }

        self.place_attestations(world);
        self.place_validators(world.validators().len());

        let head_slot = world
            .block(head.head_block)
            .map(|b| b.slot())
            .unwrap_or(head.slot);
        self.offset = Point::new(
            self.viewport.width / 2.0 - head_slot.get() as f64 * self.params.slot_width,
            self.viewport.height * self.params.head_row_fraction,
        );

        trace!(
            ordered = self.orders.len(),
            attestations = self.attestation_positions.len(),
            validators = self.validator_positions.len(),
            "Layout recomputed"
        );
    }

    fn cell_position(&self, cell: SlotOrder) -> Point {
        Point::new(
            cell.slot.get() as f64 * self.params.slot_width,
            cell.order as f64 * self.params.slot_height,
        )
    }

    fn place_attestations(&mut self, world: &WorldState) {
        let mut fan_out: HashMap<SlotOrder, usize> = HashMap::new();
        self.attestation_positions.clear();

        for attestation in world.attestations() {
            let cell = attestation
                .head()
                .resolved()
                .and_then(|ptr| self.orders.get(&ptr).copied())
                .unwrap_or(SlotOrder {
                    slot: attestation.slot(),
                    order: 0,
                });
            let k = fan_out.entry(cell).or_insert(0);
            let mut position = self.cell_position(cell);
            position.y += (*k + 1) as f64 * self.params.attestation_spacing;
            *k += 1;
            self.attestation_positions
                .insert(attestation.self_ptr(), position);
        }
    }

    fn place_validators(&mut self, count: usize) {
        let columns = self.params.validator_columns.max(1);
        let spacing = self.params.validator_spacing;
        let band_top = self.viewport.height * self.params.validator_band_fraction;
        self.validator_positions = (0..count)
            .map(|i| {
                let (row, col) = (i / columns, i % columns);
                Point::new(
                    spacing + col as f64 * spacing,
                    band_top + row as f64 * spacing,
                )
            })
            .collect();
    }

    /// Slot cell assigned to a block in the last recompute.
    pub fn block_order(&self, ptr: BlockPtr) -> Option<SlotOrder> {
        self.orders.get(&ptr).copied()
    }

    /// Block position in layer coordinates.
    pub fn block_position(&self, ptr: BlockPtr) -> Option<Point> {
        self.block_positions.get(&ptr).copied()
    }

    /// Attestation position in layer coordinates.
    pub fn attestation_position(&self, ptr: AttestationPtr) -> Option<Point> {
        self.attestation_positions.get(&ptr).copied()
    }

    /// Validator position in absolute coordinates.
    pub fn validator_position(&self, index: ValidatorIndex) -> Option<Point> {
        usize::try_from(index.get())
            .ok()
            .and_then(|i| self.validator_positions.get(i))
            .copied()
    }

    /// Layer offset from the last recompute.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Block position with the layer offset applied.
    pub fn absolute_block_position(&self, ptr: BlockPtr) -> Option<Point> {
        self.block_position(ptr).map(|p| p.offset_by(self.offset))
    }

    /// Attestation position with the layer offset applied.
    pub fn absolute_attestation_position(&self, ptr: AttestationPtr) -> Option<Point> {
        self.attestation_position(ptr)
            .map(|p| p.offset_by(self.offset))
    }

    /// Number of blocks that have ever been positioned.
    pub fn positioned_block_count(&self) -> usize {
        self.block_positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AttestationSummary, BlockSummary, ContentHash, DiffMessage, HeadSummary, Slot,
    };

    fn block(self_ptr: u64, parent: u64, slot: u64) -> BlockSummary {
        BlockSummary {
            self_ptr: BlockPtr::new(self_ptr),
            content_hash: ContentHash::new(format!("0x{self_ptr:04x}")),
            slot: Slot::new(slot),
            parent: BlockPtr::new(parent),
        }
    }

    fn attestation(ptr: u64, slot: u64, head: u64) -> AttestationSummary {
        AttestationSummary {
            self_ptr: AttestationPtr::new(ptr),
            slot: Slot::new(slot),
            committee_index: 0,
            head: BlockPtr::new(head),
            target: BlockPtr::new(head),
            source: BlockPtr::new(head),
        }
    }

    fn head(ptr: u64, slot: u64, validators: u64) -> HeadSummary {
        HeadSummary::new(BlockPtr::new(ptr), Slot::new(slot), validators)
    }

    fn layout() -> Layout {
        Layout::new(LayoutParams::default(), Viewport::new(100.0, 50.0))
    }

    #[test]
    fn no_head_is_a_no_op() {
        let mut world = WorldState::new();
        let mut diff = DiffMessage::empty(0);
        diff.blocks.push(block(1, 0, 1));
        world.apply(&diff);

        let mut layout = layout();
        layout.recompute(&world);
        assert_eq!(layout.block_position(BlockPtr::new(1)), None);
        assert_eq!(layout.offset(), Point::default());
    }

    #[test]
    fn single_block_sits_at_its_slot_column() {
        let mut world = WorldState::new();
        let mut diff = DiffMessage::empty(0);
        diff.blocks.push(block(1, 0, 1));
        diff.head.push(head(1, 1, 0));
        world.apply(&diff);

        let mut layout = layout();
        layout.recompute(&world);
        let params = layout.params();
        assert_eq!(layout.block_order(BlockPtr::new(1)).map(|o| o.order), Some(0));
        assert_eq!(
            layout.block_position(BlockPtr::new(1)),
            Some(Point::new(params.slot_width, 0.0))
        );
    }

    #[test]
    fn offset_centres_head_and_pins_head_row() {
        let mut world = WorldState::new();
        let mut diff = DiffMessage::empty(0);
        diff.blocks.push(block(1, 0, 3));
        diff.head.push(head(1, 3, 0));
        world.apply(&diff);

        let mut layout = layout();
        layout.recompute(&world);
        let params = layout.params();
        let absolute = layout.absolute_block_position(BlockPtr::new(1)).unwrap();
        assert_eq!(absolute.x, 50.0);
        assert_eq!(absolute.y, 50.0 * params.head_row_fraction);
    }

    #[test]
    fn offset_falls_back_to_summary_slot_for_unknown_head() {
        let mut world = WorldState::new();
        let mut diff = DiffMessage::empty(0);
        diff.head.push(head(9, 2, 0));
        world.apply(&diff);

        let mut layout = layout();
        layout.recompute(&world);
        assert_eq!(layout.offset().x, 50.0 - 2.0 * layout.params().slot_width);
    }

    #[test]
    fn attestations_fan_out_under_their_head_block() {
        let mut world = WorldState::new();
        let mut diff = DiffMessage::empty(0);
        diff.blocks.push(block(1, 0, 1));
        diff.attestations.push(attestation(10, 1, 1));
        diff.attestations.push(attestation(11, 1, 1));
        diff.attestations.push(attestation(12, 4, 77));
        diff.head.push(head(1, 1, 0));
        world.apply(&diff);

        let mut layout = layout();
        layout.recompute(&world);
        let p = layout.params();
        assert_eq!(
            layout.attestation_position(AttestationPtr::new(10)),
            Some(Point::new(p.slot_width, p.attestation_spacing))
        );
        assert_eq!(
            layout.attestation_position(AttestationPtr::new(11)),
            Some(Point::new(p.slot_width, 2.0 * p.attestation_spacing))
        );
        // Unresolved head: falls back to the attestation's own slot, row 0.
        assert_eq!(
            layout.attestation_position(AttestationPtr::new(12)),
            Some(Point::new(4.0 * p.slot_width, p.attestation_spacing))
        );
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut world = WorldState::new();
        let mut diff = DiffMessage::empty(0);
        diff.blocks.push(block(1, 0, 1));
        diff.blocks.push(block(2, 1, 2));
        diff.blocks.push(block(3, 1, 2));
        diff.attestations.push(attestation(10, 2, 3));
        diff.head.push(head(3, 2, 40));
        world.apply(&diff);

        let mut layout = layout();
        layout.recompute(&world);
        let first = layout.clone();
        layout.recompute(&world);

        for ptr in 1..=3 {
            let ptr = BlockPtr::new(ptr);
            assert_eq!(layout.block_position(ptr), first.block_position(ptr));
        }
        assert_eq!(
            layout.attestation_position(AttestationPtr::new(10)),
            first.attestation_position(AttestationPtr::new(10))
        );
        for i in 0..40 {
            let index = ValidatorIndex::new(i);
            assert_eq!(
                layout.validator_position(index),
                first.validator_position(index)
            );
        }
        assert_eq!(layout.offset(), first.offset());
    }

    #[test]
    fn unreached_blocks_keep_their_last_position() {
        let mut world = WorldState::new();
        let mut first = DiffMessage::empty(0);
        first.blocks.push(block(1, 0, 1));
        first.head.push(head(1, 1, 0));
        world.apply(&first);

        let mut layout = layout();
        layout.recompute(&world);
        let before = layout.block_position(BlockPtr::new(1));

        // A disjoint chain takes over as head.
        let mut second = DiffMessage::empty(1);
        second.blocks.push(block(5, 0, 4));
        second.head.push(head(5, 4, 0));
        world.apply(&second);
        layout.recompute(&world);

        assert_eq!(layout.block_order(BlockPtr::new(1)), None);
        assert_eq!(layout.block_position(BlockPtr::new(1)), before);
        assert_eq!(layout.positioned_block_count(), 2);
    }

    #[test]
    fn growing_validator_set_keeps_existing_positions() {
        let mut world = WorldState::new();
        let mut first = DiffMessage::empty(0);
        first.head.push(head(1, 1, 10));
        world.apply(&first);

        let mut layout = layout();
        layout.recompute(&world);
        let before: Vec<_> = (0..10)
            .map(|i| layout.validator_position(ValidatorIndex::new(i)))
            .collect();
        assert_eq!(layout.validator_position(ValidatorIndex::new(10)), None);

        let mut second = DiffMessage::empty(1);
        second.head.push(head(1, 1, 25));
        world.apply(&second);
        layout.recompute(&world);

        let after: Vec<_> = (0..10)
            .map(|i| layout.validator_position(ValidatorIndex::new(i)))
            .collect();
        assert_eq!(before, after);
        for i in 10..25 {
            assert!(layout.validator_position(ValidatorIndex::new(i)).is_some());
        }
    }

    #[test]
    fn validators_wrap_to_next_grid_row() {
        let params = LayoutParams {
            validator_columns: 4,
            ..LayoutParams::default()
        };
        let mut world = WorldState::new();
        let mut diff = DiffMessage::empty(0);
        diff.head.push(head(1, 1, 5));
        world.apply(&diff);

        let mut layout = Layout::new(params, Viewport::new(100.0, 40.0));
        layout.recompute(&world);
        let first = layout.validator_position(ValidatorIndex::new(0)).unwrap();
        let wrapped = layout.validator_position(ValidatorIndex::new(4)).unwrap();
        assert_eq!(first.x, wrapped.x);
        assert_eq!(wrapped.y - first.y, params.validator_spacing);
    }
}

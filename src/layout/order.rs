//! Slot-order assignment over the block tree.
//!
//! Starting at the head, the walk climbs parent pointers towards the root. At every
//! spine node it orders the node and then, depth first, every descendant that has no
//! order yet. Each slot keeps a counter, so the first block ordered in a slot gets row
//! 0, the next row 1, and so on. Because the head's own branch is ordered first, the
//! canonical chain always lands on row 0.
//!
//! The walk is iterative and guarded by the set of already ordered blocks, so corrupt
//! data containing a parent cycle terminates instead of looping.

use crate::model::{BlockPtr, Slot};
use crate::world::{TreeEntry, TreeIndex};
use std::collections::HashMap;

/// A block's cell in the slot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotOrder {
    /// Column.
    pub slot: Slot,
    /// Row within the slot, 0 at the top.
    pub order: usize,
}

/// Assign a [`SlotOrder`] to every known block reachable from `head`'s spine.
///
/// Blocks outside the spine's subtrees get no entry. Placeholder cells are never
/// ordered: when the spine reaches one, its known children are ordered and the walk
/// stops there.
pub fn assign_slot_orders(tree: &TreeIndex, head: BlockPtr) -> HashMap<BlockPtr, SlotOrder> {
    let mut walk = OrderWalk {
        tree,
        orders: HashMap::new(),
        counters: HashMap::new(),
    };

    let mut current = head;
    loop {
        match tree.get(current) {
            Some(TreeEntry::Known { parent, .. }) => {
                walk.order_subtree(current);
                if parent.is_root() || walk.orders.contains_key(parent) {
                    break;
                }
                current = *parent;
            }
            Some(TreeEntry::Unknown { children }) => {
                for child in children {
                    walk.order_subtree(*child);
                }
                break;
            }
            None => break,
        }
    }

    walk.orders
}

struct OrderWalk<'a> {
    tree: &'a TreeIndex,
    orders: HashMap<BlockPtr, SlotOrder>,
    counters: HashMap<Slot, usize>,
}

impl OrderWalk<'_> {
    /// Pre-order depth-first walk, children in insertion order.
    fn order_subtree(&mut self, start: BlockPtr) {
        let mut stack = vec![start];
        while let Some(ptr) = stack.pop() {
            if self.orders.contains_key(&ptr) {
                continue;
            }
            let Some(TreeEntry::Known { slot, children, .. }) = self.tree.get(ptr) else {
                continue;
            };

            let counter = self.counters.entry(*slot).or_insert(0);
            self.orders.insert(
                ptr,
                SlotOrder {
                    slot: *slot,
                    order: *counter,
                },
            );
            *counter += 1;

            stack.extend(
                children
                    .iter()
                    .rev()
                    .filter(|child| !self.orders.contains_key(child)),
            );
        }
    }
}

//! Parent → children adjacency for every block pointer seen so far.
//!
//! Blocks can arrive in any order, so a pointer may be referenced as a parent long
//! before its own block is delivered. Such pointers get an [`TreeEntry::Unknown`] cell
//! that only carries a children list; delivery upgrades it to [`TreeEntry::Known`].
//!
//! # Invariants
//! - A children list never contains the same pointer twice.
//! - A `Known` entry is never downgraded to `Unknown`.
//! - [`BlockPtr::ROOT`] never has an entry.
//! - Every `Known` child appears in exactly the children list of its current parent.

use crate::model::{BlockPtr, Slot};
use std::collections::HashMap;

/// One cell of the tree index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    /// The block has been delivered.
    Known {
        /// Parent pointer, [`BlockPtr::ROOT`] for a chain root.
        parent: BlockPtr,
        /// Proposal slot.
        slot: Slot,
        /// Children in insertion order.
        children: Vec<BlockPtr>,
    },
    /// Only referenced as someone's parent so far.
    Unknown {
        /// Children in insertion order.
        children: Vec<BlockPtr>,
    },
}

impl TreeEntry {
    /// Children in insertion order.
    pub fn children(&self) -> &[BlockPtr] {
        match self {
            TreeEntry::Known { children, .. } | TreeEntry::Unknown { children } => children,
        }
    }

    /// Parent pointer, if the block has been delivered.
    pub fn parent(&self) -> Option<BlockPtr> {
        match self {
            TreeEntry::Known { parent, .. } => Some(*parent),
            TreeEntry::Unknown { .. } => None,
        }
    }

    /// Slot, if the block has been delivered.
    pub fn slot(&self) -> Option<Slot> {
        match self {
            TreeEntry::Known { slot, .. } => Some(*slot),
            TreeEntry::Unknown { .. } => None,
        }
    }

    /// Whether the block has been delivered.
    pub fn is_known(&self) -> bool {
        matches!(self, TreeEntry::Known { .. })
    }

    fn children_mut(&mut self) -> &mut Vec<BlockPtr> {
        match self {
            TreeEntry::Known { children, .. } | TreeEntry::Unknown { children } => children,
        }
    }
}

/// Incrementally maintained block tree.
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    entries: HashMap<BlockPtr, TreeEntry>,
}

impl TreeIndex {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the delivery of `self_ptr` with the given parent and slot.
    ///
    /// Redelivery with a different parent moves the block under its new parent.
    pub fn insert_block(&mut self, self_ptr: BlockPtr, parent: BlockPtr, slot: Slot) {
        debug_assert!(!self_ptr.is_root(), "root sentinel cannot be a block");

        let previous_parent = match self.entries.remove(&self_ptr) {
            Some(TreeEntry::Known {
                parent: old_parent,
                children,
                ..
            }) => {
                self.entries.insert(
                    self_ptr,
                    TreeEntry::Known {
                        parent,
                        slot,
                        children,
                    },
                );
                Some(old_parent)
            }
            Some(TreeEntry::Unknown { children }) => {
                self.entries.insert(
                    self_ptr,
                    TreeEntry::Known {
                        parent,
                        slot,
                        children,
                    },
                );
                None
            }
            None => {
                self.entries.insert(
                    self_ptr,
                    TreeEntry::Known {
                        parent,
                        slot,
                        children: Vec::new(),
                    },
                );
                None
            }
        };

        if let Some(old_parent) = previous_parent {
            if old_parent == parent {
                return;
            }
            if let Some(entry) = self.entries.get_mut(&old_parent) {
                entry.children_mut().retain(|child| *child != self_ptr);
            }
        }

        if parent.is_root() {
            return;
        }
        let parent_entry = self
            .entries
            .entry(parent)
            .or_insert_with(|| TreeEntry::Unknown {
                children: Vec::new(),
            });
        let children = parent_entry.children_mut();
        if !children.contains(&self_ptr) {
            children.push(self_ptr);
        }
    }

    /// Entry for `ptr`, known or placeholder.
    pub fn get(&self, ptr: BlockPtr) -> Option<&TreeEntry> {
        self.entries.get(&ptr)
    }

    /// Whether `ptr` has been delivered as a block.
    pub fn is_known(&self, ptr: BlockPtr) -> bool {
        self.entries.get(&ptr).is_some_and(TreeEntry::is_known)
    }

    /// Children of `ptr`; empty when the pointer is unseen.
    pub fn children(&self, ptr: BlockPtr) -> &[BlockPtr] {
        self.entries.get(&ptr).map(TreeEntry::children).unwrap_or(&[])
    }

    /// Number of cells, placeholders included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of delivered blocks.
    pub fn known_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_known()).count()
    }

    /// All cells, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockPtr, &TreeEntry)> {
        self.entries.iter().map(|(ptr, entry)| (*ptr, entry))
    }
}

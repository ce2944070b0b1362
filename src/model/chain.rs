//! Merged chain entities owned by the world state.

use super::diff::{BlockSummary, ContentHash};
use super::identifiers::{AttestationPtr, BlockPtr, Slot};

/// A block merged into the world state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    self_ptr: BlockPtr,
    parent_ptr: BlockPtr,
    slot: Slot,
    content_hash: ContentHash,
}

impl Block {
    /// Build from the summary it was delivered as.
    pub fn from_summary(summary: &BlockSummary) -> Self {
        Self {
            self_ptr: summary.self_ptr,
            parent_ptr: summary.parent,
            slot: summary.slot,
            content_hash: summary.content_hash.clone(),
        }
    }

    /// Pointer of this block.
    pub fn self_ptr(&self) -> BlockPtr {
        self.self_ptr
    }

    /// Parent pointer, [`BlockPtr::ROOT`] for a chain root.
    pub fn parent_ptr(&self) -> BlockPtr {
        self.parent_ptr
    }

    /// Proposal slot.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Hash tree root.
    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }
}

/// A block reference held by an attestation.
///
/// Resolution happens once, when the attestation is instantiated. A reference
/// to a block that had not arrived yet stays `Unresolved` for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef {
    /// The block was known when the attestation arrived.
    Resolved(BlockPtr),
    /// The block was not known; the raw pointer is kept for display.
    Unresolved(BlockPtr),
}

impl BlockRef {
    /// The resolved pointer, if any.
    pub fn resolved(self) -> Option<BlockPtr> {
        match self {
            BlockRef::Resolved(ptr) => Some(ptr),
            BlockRef::Unresolved(_) => None,
        }
    }

    /// The pointer as delivered, resolved or not.
    pub fn raw(self) -> BlockPtr {
        match self {
            BlockRef::Resolved(ptr) | BlockRef::Unresolved(ptr) => ptr,
        }
    }
}

/// An attestation merged into the world state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attestation {
    self_ptr: AttestationPtr,
    slot: Slot,
    committee_index: u64,
    head: BlockRef,
    target: BlockRef,
    source: BlockRef,
}

impl Attestation {
    /// Assemble an attestation from already-resolved references.
    pub fn new(
        self_ptr: AttestationPtr,
        slot: Slot,
        committee_index: u64,
        head: BlockRef,
        target: BlockRef,
        source: BlockRef,
    ) -> Self {
        Self {
            self_ptr,
            slot,
            committee_index,
            head,
            target,
            source,
        }
    }

    /// Pointer of this attestation.
    pub fn self_ptr(&self) -> AttestationPtr {
        self.self_ptr
    }

    /// Attested slot.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Producing committee.
    pub fn committee_index(&self) -> u64 {
        self.committee_index
    }

    /// Head vote reference.
    pub fn head(&self) -> BlockRef {
        self.head
    }

    /// Target checkpoint reference.
    pub fn target(&self) -> BlockRef {
        self.target
    }

    /// Source checkpoint reference.
    pub fn source(&self) -> BlockRef {
        self.source
    }
}

//! The diff message data contract.
//!
//! A diff is one ordered, monotonically indexed batch of new chain state. The
//! parser builds these from JSON; the world state consumes them.

use super::head::HeadSummary;
use super::identifiers::{AttestationPtr, BlockPtr, Slot, ValidatorIndex};
use std::fmt;

/// Hash tree root of a block, kept as the hex string it was delivered as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Wrap a hash as delivered. Empty hashes are kept; labels just show nothing.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The hash as delivered.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First few characters, for labels.
    pub fn short(&self) -> &str {
        let trimmed = self.0.strip_prefix("0x").unwrap_or(&self.0);
        let end = trimmed
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A block as announced in a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSummary {
    /// Pointer of the block itself. The reducer skips [`BlockPtr::ROOT`].
    pub self_ptr: BlockPtr,
    /// Hash tree root.
    pub content_hash: ContentHash,
    /// Slot the block was proposed in.
    pub slot: Slot,
    /// Parent pointer, [`BlockPtr::ROOT`] for a chain root.
    pub parent: BlockPtr,
}

/// An attestation as announced in a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationSummary {
    /// Pointer of the attestation itself.
    pub self_ptr: AttestationPtr,
    /// Slot the attestation was made for.
    pub slot: Slot,
    /// Committee that produced it.
    pub committee_index: u64,
    /// LMD-GHOST head vote.
    pub head: BlockPtr,
    /// FFG target checkpoint block.
    pub target: BlockPtr,
    /// FFG source checkpoint block.
    pub source: BlockPtr,
}

/// A validator's latest vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteSummary {
    /// Voting validator.
    pub validator_index: ValidatorIndex,
    /// Attestation that carries the vote.
    pub attestation_ptr: AttestationPtr,
}

/// Running totals the sender had emitted before this diff.
///
/// Used only as a desynchronisation hint; the diff index is the ordering
/// authority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviousCounts {
    /// Head summaries sent so far.
    pub head: u64,
    /// Finalized pointers sent so far.
    pub finalized: u64,
    /// Blocks sent so far.
    pub blocks: u64,
    /// Attestations sent so far.
    pub attestations: u64,
    /// Votes sent so far.
    pub latest_votes: u64,
}

/// One incremental batch of chain state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffMessage {
    /// Position of this diff in the stream, starting at zero.
    pub diff_index: u64,
    /// Totals before this diff.
    pub previous: PreviousCounts,
    /// New head summaries, oldest first.
    pub head: Vec<HeadSummary>,
    /// Newly finalized blocks.
    pub finalized: Vec<BlockPtr>,
    /// New blocks, in delivery order.
    pub blocks: Vec<BlockSummary>,
    /// New attestations, in delivery order.
    pub attestations: Vec<AttestationSummary>,
    /// New latest votes.
    pub latest_votes: Vec<VoteSummary>,
}

impl DiffMessage {
    /// An empty diff at `diff_index`.
    pub fn empty(diff_index: u64) -> Self {
        Self {
            diff_index,
            previous: PreviousCounts::default(),
            head: Vec::new(),
            finalized: Vec::new(),
            blocks: Vec::new(),
            attestations: Vec::new(),
            latest_votes: Vec::new(),
        }
    }

    /// Whether the diff carries no entities at all.
    pub fn is_empty(&self) -> bool {
        self.head.is_empty()
            && self.finalized.is_empty()
            && self.blocks.is_empty()
            && self.attestations.is_empty()
            && self.latest_votes.is_empty()
    }
}

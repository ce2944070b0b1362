//! Domain model types (pure).
//!
//! All types in this module are plain data: the diff contract, head snapshots, and the
//! chain entities the world state owns.

pub mod chain;
pub mod diff;
pub mod error;
pub mod head;
pub mod identifiers;
pub mod key_action;

// Re-export for convenience
pub use chain::{Attestation, Block, BlockRef};
pub use diff::{
    AttestationSummary, BlockSummary, ContentHash, DiffMessage, PreviousCounts, VoteSummary,
};
pub use error::{AppError, InputError, ParseError};
pub use head::{Checkpoint, Checkpoints, HeadSummary, StakingTotals, ValidatorCounts};
pub use identifiers::{AttestationPtr, BlockPtr, Slot, ValidatorIndex};
pub use key_action::KeyAction;

//! World state: the diff reducer and its derived structures.

pub mod state;
pub mod tree;
pub mod validators;

pub use state::{ApplyOutcome, DeliveredCounts, MergeReport, WorldState};
pub use tree::{TreeEntry, TreeIndex};
pub use validators::{CastVote, Validator, ValidatorSet, VOTES_PER_VALIDATOR};

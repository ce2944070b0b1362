//! JSON decoder for diff messages.
//!
//! This module provides pure parsing functions for converting one JSON line of the
//! diff stream into a validated [`DiffMessage`]. Nothing here touches the world state:
//! a message that fails to decode never reaches the reducer.

use crate::model::{
    AttestationPtr, AttestationSummary, BlockPtr, BlockSummary, Checkpoint, Checkpoints,
    ContentHash, DiffMessage, HeadSummary, ParseError, PreviousCounts, Slot, StakingTotals,
    ValidatorCounts, ValidatorIndex, VoteSummary,
};
use serde::Deserialize;
use tracing::warn;

/// Raw JSON structure for deserializing a diff message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDiff {
    diff_index: u64,
    #[serde(default)]
    previous: RawPrevious,
    #[serde(default)]
    head: Vec<RawHeadSummary>,
    #[serde(default)]
    finalized: Vec<BlockPtr>,
    #[serde(default)]
    blocks: Vec<RawBlock>,
    #[serde(default)]
    attestations: Vec<RawAttestation>,
    #[serde(default)]
    latest_votes: Vec<RawVote>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPrevious {
    #[serde(default)]
    head: u64,
    #[serde(default)]
    finalized: u64,
    #[serde(default)]
    blocks: u64,
    #[serde(default)]
    attestations: u64,
    #[serde(default)]
    latest_votes: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHeadSummary {
    head_block: BlockPtr,
    slot: Slot,
    validator_counts: RawValidatorCounts,
    #[serde(default)]
    staking: RawStaking,
    #[serde(default)]
    checkpoints: RawCheckpoints,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawValidatorCounts {
    total: u64,
    #[serde(default)]
    active: u64,
    #[serde(default)]
    pending: u64,
    #[serde(default)]
    exited: u64,
    #[serde(default)]
    slashed: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStaking {
    #[serde(default)]
    total_balance: u64,
    #[serde(default)]
    active_balance: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCheckpoints {
    #[serde(default)]
    previous_justified: RawCheckpoint,
    #[serde(default)]
    current_justified: RawCheckpoint,
    #[serde(default)]
    finalized: RawCheckpoint,
}

#[derive(Debug, Default, Deserialize)]
struct RawCheckpoint {
    #[serde(default)]
    epoch: u64,
    #[serde(default)]
    root: BlockPtr,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    self_ptr: BlockPtr,
    htr: String,
    slot: Slot,
    parent: BlockPtr,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttestation {
    self_ptr: AttestationPtr,
    slot: Slot,
    comm_index: u64,
    head: BlockPtr,
    target: BlockPtr,
    source: BlockPtr,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVote {
    validator_index: ValidatorIndex,
    attestation_ptr: AttestationPtr,
}

/// Decode one line of the diff stream into a [`DiffMessage`].
///
/// This is the main entry point for parsing. It:
/// - Deserializes the JSON (absent arrays default to empty)
/// - Validates the fields the diff contract constrains
/// - Returns a fully validated `DiffMessage`
///
/// # Arguments
///
/// * `raw` - The raw JSON line
/// * `line_number` - 1-based position of the line in the stream, for error reporting
///
/// # Errors
///
/// Returns `ParseError::InvalidJson` if the JSON is malformed or does not match the
/// diff schema. Odd but well-typed values (a self-parented block, an empty hash, a
/// block claiming the root pointer) decode fine and are left to the reducer.
pub fn parse_diff(raw: &str, line_number: usize) -> Result<DiffMessage, ParseError> {
    let raw_diff: RawDiff = serde_json::from_str(raw).map_err(|e| ParseError::InvalidJson {
        line: line_number,
        message: e.to_string(),
    })?;

    let blocks = raw_diff.blocks.into_iter().map(convert_block).collect();

    let attestations = raw_diff
        .attestations
        .into_iter()
        .map(|att| AttestationSummary {
            self_ptr: att.self_ptr,
            slot: att.slot,
            committee_index: att.comm_index,
            head: att.head,
            target: att.target,
            source: att.source,
        })
        .collect();

    let latest_votes = raw_diff
        .latest_votes
        .into_iter()
        .map(|vote| VoteSummary {
            validator_index: vote.validator_index,
            attestation_ptr: vote.attestation_ptr,
        })
        .collect();

    Ok(DiffMessage {
        diff_index: raw_diff.diff_index,
        previous: PreviousCounts {
            head: raw_diff.previous.head,
            finalized: raw_diff.previous.finalized,
            blocks: raw_diff.previous.blocks,
            attestations: raw_diff.previous.attestations,
            latest_votes: raw_diff.previous.latest_votes,
        },
        head: raw_diff.head.into_iter().map(convert_head).collect(),
        finalized: raw_diff.finalized,
        blocks,
        attestations,
        latest_votes,
    })
}

fn convert_block(raw: RawBlock) -> BlockSummary {
    if raw.parent == raw.self_ptr {
        warn!(block = %raw.self_ptr, "Block names itself as parent");
    }
    BlockSummary {
        self_ptr: raw.self_ptr,
        content_hash: ContentHash::new(raw.htr),
        slot: raw.slot,
        parent: raw.parent,
    }
}

fn convert_head(raw: RawHeadSummary) -> HeadSummary {
    let checkpoint = |c: RawCheckpoint| Checkpoint {
        epoch: c.epoch,
        root: c.root,
    };
    HeadSummary {
        head_block: raw.head_block,
        slot: raw.slot,
        validator_counts: ValidatorCounts {
            total: raw.validator_counts.total,
            active: raw.validator_counts.active,
            pending: raw.validator_counts.pending,
            exited: raw.validator_counts.exited,
            slashed: raw.validator_counts.slashed,
        },
        staking: StakingTotals {
            total_balance: raw.staking.total_balance,
            active_balance: raw.staking.active_balance,
        },
        checkpoints: Checkpoints {
            previous_justified: checkpoint(raw.checkpoints.previous_justified),
            current_justified: checkpoint(raw.checkpoints.current_justified),
            finalized: checkpoint(raw.checkpoints.finalized),
        },
    }
}

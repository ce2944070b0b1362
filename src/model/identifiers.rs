//! Core identifier newtypes.
//!
//! Every entity in the world state is keyed by an opaque integer. Each kind of
//! key gets its own type so a block pointer can never be used to look up an
//! attestation.

use serde::Deserialize;
use std::fmt;

/// Pointer to a block in the diff stream.
///
/// `BlockPtr::ROOT` (zero) is reserved: it means "no parent" and is never
/// delivered as a block itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct BlockPtr(u64);

impl BlockPtr {
    /// The root sentinel: "no parent".
    pub const ROOT: BlockPtr = BlockPtr(0);

    /// Wrap a raw pointer value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw pointer value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whether this is the root sentinel.
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl Default for BlockPtr {
    fn default() -> Self {
        BlockPtr::ROOT
    }
}

impl fmt::Display for BlockPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block#{}", self.0)
    }
}

/// Pointer to an attestation in the diff stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct AttestationPtr(u64);

impl AttestationPtr {
    /// Wrap a raw pointer value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw pointer value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AttestationPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "att#{}", self.0)
    }
}

/// Index of a validator in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ValidatorIndex(u64);

impl ValidatorIndex {
    /// Wrap a raw index.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw index value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ValidatorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validator#{}", self.0)
    }
}

/// Beacon-chain slot number.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize,
)]
#[serde(transparent)]
pub struct Slot(u64);

impl Slot {
    /// Wrap a raw slot number.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw slot number.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_sentinel_is_zero() {
        assert!(BlockPtr::ROOT.is_root());
        assert_eq!(BlockPtr::ROOT.get(), 0);
        assert!(!BlockPtr::new(7).is_root());
    }

    #[test]
    fn identifiers_deserialize_from_bare_integers() {
        let ptr: BlockPtr = serde_json::from_str("42").unwrap();
        let att: AttestationPtr = serde_json::from_str("9").unwrap();
        let idx: ValidatorIndex = serde_json::from_str("3").unwrap();
        let slot: Slot = serde_json::from_str("128").unwrap();

        assert_eq!(ptr, BlockPtr::new(42));
        assert_eq!(att, AttestationPtr::new(9));
        assert_eq!(idx, ValidatorIndex::new(3));
        assert_eq!(slot, Slot::new(128));
    }

    #[test]
    fn identifiers_reject_negative_values() {
        assert!(serde_json::from_str::<BlockPtr>("-1").is_err());
        assert!(serde_json::from_str::<Slot>("-5").is_err());
    }

    #[test]
    fn display_names_entity_kind() {
        assert_eq!(BlockPtr::new(5).to_string(), "block#5");
        assert_eq!(AttestationPtr::new(6).to_string(), "att#6");
        assert_eq!(ValidatorIndex::new(7).to_string(), "validator#7");
        assert_eq!(Slot::new(8).to_string(), "8");
    }
}

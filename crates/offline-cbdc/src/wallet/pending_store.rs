//! pending-spend ledger
//!
//! every offline spend is recorded here until reconciliation with the bank,
//! keyed by the canonical encoding of its nullifier. duplicates are
//! rejected; clearing is idempotent.

use std::collections::HashMap;

use k256::ProjectivePoint;

use crate::curve::{serialize_point, POINT_LEN};
use crate::zkp::RecursiveInvariantProof;
use crate::{Error, Result};

/// a locally completed offline spend awaiting reconciliation
#[derive(Clone, Debug)]
pub struct PendingSpend {
    /// the published nullifier
    pub nullifier: ProjectivePoint,
    /// the recursive invariant proof produced with the spend
    pub proof: RecursiveInvariantProof,
    /// when the spend was recorded, seconds since epoch
    pub timestamp: u64,
}

/// nullifier-keyed ledger of spends pending reconciliation
#[derive(Debug, Default)]
pub struct PendingStore {
    pending: HashMap<[u8; POINT_LEN], PendingSpend>,
}

impl PendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// record a new pending spend; duplicates are rejected
    pub fn add(
        &mut self,
        nullifier: &ProjectivePoint,
        proof: RecursiveInvariantProof,
        timestamp: u64,
    ) -> Result<()> {
        let key = serialize_point(nullifier)?;
        if self.pending.contains_key(&key) {
            return Err(Error::AlreadyExists("spend already recorded as pending"));
        }
        self.pending.insert(
            key,
            PendingSpend {
                nullifier: *nullifier,
                proof,
                timestamp,
            },
        );
        Ok(())
    }

    /// whether a nullifier is pending
    pub fn contains(&self, nullifier: &ProjectivePoint) -> bool {
        serialize_point(nullifier)
            .map(|key| self.pending.contains_key(&key))
            .unwrap_or(false)
    }

    /// all pending spends
    pub fn list_pending(&self) -> Vec<&PendingSpend> {
        self.pending.values().collect()
    }

    /// remove a spend after successful reconciliation; idempotent
    pub fn clear(&mut self, nullifier: &ProjectivePoint) {
        if let Ok(key) = serialize_point(nullifier) {
            self.pending.remove(&key);
        }
    }

    pub fn count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

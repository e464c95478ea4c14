//! offline transactions: authorization, verification, and acceptance
//!
//! the sender turns a spend bundle into a device-signed offline transaction;
//! the receiver verifies the device authorization, the ownership and value
//! proofs, and its local double-spend set before mutating any state.

use std::collections::HashSet;

use k256::ProjectivePoint;
use rand_core::{CryptoRng, RngCore};

use crate::curve::{serialize_point, POINT_LEN};
use crate::device::transcript::{build_authorization_transcript, verify_spend_authorization};
use crate::device::{DeviceCertificate, DeviceIdentity};
use crate::state::ProofState;
use crate::token::Token;
use crate::wallet::SpendBundle;
use crate::zkp::{verify_spend_ownership, SpendProof, ValueBundle};
use crate::Result;

/// a complete device-authorized offline spend, ready to hand to a receiver
#[derive(Clone, Debug)]
pub struct OfflineTransaction {
    /// nullifiers of the consumed inputs
    pub input_serials: Vec<ProjectivePoint>,
    /// derived output tokens transferred to the receiver
    pub output_tokens: Vec<Token>,
    /// ownership proofs paired with their input commitments
    pub spend_proofs: Vec<(ProjectivePoint, SpendProof)>,
    /// value conservation statement and proof
    pub value_bundle: ValueBundle,
    /// the 32-byte device authorization transcript
    pub spend_transcript_hash: [u8; 32],
    /// device schnorr signature over the transcript
    pub device_signature: Vec<u8>,
    /// bank-issued certificate for the signing device
    pub device_certificate: DeviceCertificate,
}

/// receiver-side wallet state
#[derive(Debug, Default)]
pub struct ReceiverState {
    /// canonical encodings of every nullifier this receiver has accepted
    pub seen_nullifiers: HashSet<[u8; POINT_LEN]>,
    /// tokens received through accepted transactions
    pub owned_tokens: Vec<Token>,
    /// optional running proof-state for reconciliation
    pub proof_state: Option<ProofState>,
}

impl ReceiverState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// authorize a spend bundle on the sending device
///
/// refuses under a stale or unsigned certificate, builds the authorization
/// transcript over the bundle, and signs it with the device key.
pub fn authorize_spend<R: RngCore + CryptoRng>(
    bundle: &SpendBundle,
    device: &DeviceIdentity,
    certificate: DeviceCertificate,
    nonce: &[u8; 32],
    now: u64,
    rng: &mut R,
) -> Result<OfflineTransaction> {
    certificate.ensure_fresh(now)?;

    let output_commitments: Vec<ProjectivePoint> =
        bundle.tokens.iter().map(|t| t.commitment).collect();
    let transcript = build_authorization_transcript(
        &bundle.nullifiers,
        &output_commitments,
        &bundle.spend_proofs,
        &bundle.value_bundle,
        nonce,
    )?;
    let signature = device.sign_spend_transcript(&transcript, rng)?;

    Ok(OfflineTransaction {
        input_serials: bundle.nullifiers.clone(),
        output_tokens: bundle.tokens.clone(),
        spend_proofs: bundle.spend_proofs.clone(),
        value_bundle: bundle.value_bundle.clone(),
        spend_transcript_hash: transcript,
        device_signature: signature,
        device_certificate: certificate,
    })
}

/// receiver-side verification of a complete offline transaction
///
/// checks, in order: device authorization and certificate, every spend
/// ownership proof, value conservation, and the local seen-nullifier set.
pub fn verify_offline_transaction(
    tx: &OfflineTransaction,
    pk_bank: &ProjectivePoint,
    seen_nullifiers: &HashSet<[u8; POINT_LEN]>,
    now: u64,
) -> bool {
    if !verify_spend_authorization(
        &tx.spend_transcript_hash,
        &tx.device_signature,
        &tx.device_certificate,
        pk_bank,
        now,
    ) {
        return false;
    }

    if tx.input_serials.len() != tx.spend_proofs.len() {
        return false;
    }
    for (serial, (commitment, proof)) in tx.input_serials.iter().zip(&tx.spend_proofs) {
        if !verify_spend_ownership(commitment, serial, proof) {
            return false;
        }
    }

    if !tx.value_bundle.verify() {
        return false;
    }

    for serial in &tx.input_serials {
        let Ok(key) = serialize_point(serial) else {
            return false;
        };
        if seen_nullifiers.contains(&key) {
            return false;
        }
    }

    true
}

/// apply a verified offline transaction to receiver state
///
/// records every input nullifier as seen, takes ownership of the output
/// tokens, and folds them into the optional proof-state. callers must have
/// verified the transaction first.
pub fn accept_offline_transaction(
    tx: &OfflineTransaction,
    state: &mut ReceiverState,
) -> Result<()> {
    for serial in &tx.input_serials {
        state.seen_nullifiers.insert(serialize_point(serial)?);
    }

    state.owned_tokens.extend(tx.output_tokens.iter().cloned());

    if let Some(proof_state) = &mut state.proof_state {
        proof_state.update_from_spend(&[], &tx.output_tokens);
    }

    tracing::info!(
        "accepted offline transaction, {} token(s) received",
        tx.output_tokens.len()
    );
    Ok(())
}

/// offline database of spent nullifiers
#[derive(Debug, Default)]
pub struct SpentSerialDb {
    spent: HashSet<[u8; POINT_LEN]>,
}

impl SpentSerialDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// whether a nullifier has been recorded
    pub fn is_spent(&self, serial: &ProjectivePoint) -> bool {
        serialize_point(serial)
            .map(|key| self.spent.contains(&key))
            .unwrap_or(false)
    }

    /// record a nullifier as spent
    pub fn mark_spent(&mut self, serial: &ProjectivePoint) -> Result<()> {
        self.spent.insert(serialize_point(serial)?);
        Ok(())
    }
}

/// full offline spend verification pipeline: proof, double-spend check,
/// record
pub fn verify_and_record_spend(
    commitment: &ProjectivePoint,
    serial: &ProjectivePoint,
    proof: &SpendProof,
    db: &mut SpentSerialDb,
) -> bool {
    if !verify_spend_ownership(commitment, serial, proof) {
        return false;
    }
    if db.is_spent(serial) {
        return false;
    }
    db.mark_spent(serial).is_ok()
}

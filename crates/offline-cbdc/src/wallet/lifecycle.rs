//! token lifecycle orchestration
//!
//! mints tokens through the bank collaborator and performs two-phase atomic
//! offline spends: phase 1 computes proofs and derived tokens without
//! touching any state, phase 2 commits every mutation together. every
//! phase-2 precondition is validated during phase 1, so a failed spend
//! leaves the wallet exactly as it was.

use k256::ecdsa::VerifyingKey;
use k256::{ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};

use crate::bank::BankMint;
use crate::commitment::commit;
use crate::curve::{hash_to_scalar, random_scalar, serialize_point};
use crate::state::ProofState;
use crate::token::{Token, TokenState};
use crate::wallet::pending_store::PendingStore;
use crate::wallet::token_store::TokenStore;
use crate::zkp::{
    derive_serial, prove_minting, prove_recursive_invariant, prove_spend_ownership,
    prove_value_conservation, RecursiveInvariantProof, SpendProof, ValueBundle,
};
use crate::{Error, Result};

/// everything a single offline spend produces
#[derive(Clone, Debug)]
pub struct SpendBundle {
    /// derived output and change tokens, no bank signature yet
    pub tokens: Vec<Token>,
    /// published nullifiers of the consumed inputs
    pub nullifiers: Vec<ProjectivePoint>,
    /// ownership proofs paired with their input commitments
    pub spend_proofs: Vec<(ProjectivePoint, SpendProof)>,
    /// value conservation statement and proof
    pub value_bundle: ValueBundle,
    /// invariant proof over the post-spend wallet state
    pub recursive_proof: RecursiveInvariantProof,
}

/// wallet-side mint and spend orchestration over the token store, pending
/// ledger, and proof-state
#[derive(Debug, Default)]
pub struct TokenLifecycle {
    pub store: TokenStore,
    pub pending: PendingStore,
    pub proof_state: ProofState,
}

impl TokenLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// mint a token of the given denomination through the bank collaborator
    ///
    /// builds the commitment and denomination proof, submits them, verifies
    /// the bank's issuance signature, and stores the reconstructed wallet
    /// token as UNSPENT.
    pub fn mint<B, R>(
        &mut self,
        value: u64,
        bank: &mut B,
        bank_issuing_key: &VerifyingKey,
        now: u64,
        rng: &mut R,
    ) -> Result<Token>
    where
        B: BankMint,
        R: RngCore + CryptoRng,
    {
        let r = random_scalar(rng);
        let commitment = commit(value, &r);
        let proof = prove_minting(value, &r, &commitment, rng)?;

        let bank_token = bank.mint_token(&commitment, &proof, now)?;

        let token = Token {
            serial: bank_token.serial,
            commitment: bank_token.commitment,
            expiry: bank_token.expiry,
            signature: Some(bank_token.signature),
            v: value,
            r,
            s: bank_token.serial,
        };

        if !token.verify_bank_signature(bank_issuing_key) {
            return Err(Error::InvalidSignature);
        }

        self.store.add_token(token.clone())?;
        tracing::debug!("minted token, expiry {}", token.expiry);
        Ok(token)
    }

    /// spend one token offline into an output and a change token
    ///
    /// two-phase: phase 1 computes the nullifier, all three proofs, and the
    /// derived tokens without mutating anything; phase 2 applies the
    /// proof-state update, marks the input SPENT, stores both derived tokens,
    /// and records the pending spend. every phase-2 precondition is checked
    /// in phase 1; an error after the commit starts would leave the wallet
    /// inconsistent and is propagated as such.
    pub fn spend<R: RngCore + CryptoRng>(
        &mut self,
        input_serial: &Scalar,
        v_out: u64,
        v_change: u64,
        expiry: u64,
        now: u64,
        rng: &mut R,
    ) -> Result<SpendBundle> {
        // phase 1: compute only
        if self.store.get_token_state(input_serial)? != TokenState::Unspent {
            return Err(Error::NotSpendable);
        }
        let input = self.store.get(input_serial)?.clone();

        if v_out.checked_add(v_change) != Some(input.v) {
            return Err(Error::InvalidInput("input value does not match outputs"));
        }

        let nullifier = derive_serial(&input.s);
        let spend_proof = prove_spend_ownership(
            input.v,
            &input.r,
            &input.s,
            &input.commitment,
            &nullifier,
            rng,
        )?;

        let r_out = random_scalar(rng);
        let r_change = random_scalar(rng);
        let c_out = commit(v_out, &r_out);
        let c_change = commit(v_change, &r_change);

        let value_proof = prove_value_conservation(
            input.v,
            &input.r,
            v_out,
            &r_out,
            v_change,
            &r_change,
            &input.commitment,
            &c_out,
            &c_change,
            rng,
        )?;

        // deterministic local serials: a derived token's identity is a
        // function of its commitment alone, so re-derivation is idempotent
        let serial_out = hash_to_scalar(&serialize_point(&c_out)?);
        let serial_change = hash_to_scalar(&serialize_point(&c_change)?);

        let token_out = Token {
            serial: serial_out,
            commitment: c_out,
            expiry,
            signature: None,
            v: v_out,
            r: r_out,
            s: random_scalar(rng),
        };
        let token_change = Token {
            serial: serial_change,
            commitment: c_change,
            expiry,
            signature: None,
            v: v_change,
            r: r_change,
            s: random_scalar(rng),
        };

        // invariant proof over the post-spend state, built on a copy so a
        // failure here cannot leave the wallet half-updated
        let mut next_state = self.proof_state.clone();
        next_state.update_from_spend(
            std::slice::from_ref(&input),
            &[token_out.clone(), token_change.clone()],
        );
        let recursive_proof = prove_recursive_invariant(&next_state, rng)?;

        // pre-validate every phase-2 store precondition
        if serial_out == serial_change
            || self.store.contains(&serial_out)
            || self.store.contains(&serial_change)
        {
            return Err(Error::AlreadyExists("derived token serial already in store"));
        }
        if self.pending.contains(&nullifier) {
            return Err(Error::AlreadyExists("spend already recorded as pending"));
        }

        // phase 2: commit
        self.proof_state = next_state;
        self.store.mark_spent(input_serial)?;
        self.store.add_token(token_out.clone())?;
        self.store.add_token(token_change.clone())?;
        self.pending.add(&nullifier, recursive_proof.clone(), now)?;

        tracing::info!(
            "offline spend committed, {} spend(s) pending reconciliation",
            self.pending.count()
        );

        Ok(SpendBundle {
            tokens: vec![token_out, token_change],
            nullifiers: vec![nullifier],
            spend_proofs: vec![(input.commitment, spend_proof)],
            value_bundle: ValueBundle {
                c_in: input.commitment,
                c_out,
                c_change,
                proof: value_proof,
            },
            recursive_proof,
        })
    }
}

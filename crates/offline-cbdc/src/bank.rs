//! bank-side token issuance
//!
//! the bank is an external collaborator to the wallet core: it verifies the
//! denomination proof, draws a fresh serial, sets the expiry, and signs the
//! token record with its ecdsa issuance key. the bank never learns the
//! committed value, the blinding factor, or the nullifier secret.

use k256::ecdsa::signature::Signer;
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::{ProjectivePoint, Scalar};
use rand_core::{CryptoRng, OsRng, RngCore};

use crate::curve::random_scalar;
use crate::token::token_signing_message;
use crate::zkp::{verify_minting, DenominationProof};
use crate::{Error, Result};

/// default token validity: 30 days
pub const DEFAULT_TOKEN_TTL: u64 = 30 * 24 * 60 * 60;

/// issuance policy for minted tokens
#[derive(Clone, Debug)]
pub struct MintPolicy {
    /// token validity in seconds from mint time
    pub token_ttl: u64,
}

impl Default for MintPolicy {
    fn default() -> Self {
        Self {
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }
}

/// a bank-signed token record returned from minting
///
/// carries only the public face of the token; the wallet reconstructs the
/// private fields it already knows.
#[derive(Clone, Debug)]
pub struct BankToken {
    pub serial: Scalar,
    pub commitment: ProjectivePoint,
    pub expiry: u64,
    pub signature: Vec<u8>,
}

/// the bank-mint collaborator interface consumed by the wallet
pub trait BankMint {
    /// verify the denomination proof and return a signed token record
    fn mint_token(
        &mut self,
        commitment: &ProjectivePoint,
        proof: &DenominationProof,
        now: u64,
    ) -> Result<BankToken>;
}

/// a bank holding an ecdsa issuance keypair and a mint policy
#[derive(Clone, Debug)]
pub struct Bank {
    signing_key: SigningKey,
    policy: MintPolicy,
}

impl Bank {
    /// create a bank with a fresh issuance keypair
    pub fn generate<R: RngCore + CryptoRng>(policy: MintPolicy, rng: &mut R) -> Self {
        Self {
            signing_key: SigningKey::random(rng),
            policy,
        }
    }

    /// the public issuance verification key wallets check signatures against
    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl BankMint for Bank {
    fn mint_token(
        &mut self,
        commitment: &ProjectivePoint,
        proof: &DenominationProof,
        now: u64,
    ) -> Result<BankToken> {
        if !verify_minting(commitment, proof) {
            return Err(Error::ProofInvalid);
        }

        let serial = random_scalar(&mut OsRng);
        let expiry = now + self.policy.token_ttl;

        let message = token_signing_message(&serial, commitment, expiry)?;
        let signature: Signature = self.signing_key.sign(&message);

        Ok(BankToken {
            serial,
            commitment: *commitment,
            expiry,
            signature: signature.to_bytes().to_vec(),
        })
    }
}

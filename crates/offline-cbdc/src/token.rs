//! tokens and their lifecycle states
//!
//! a token's public face is (serial, commitment, expiry, bank signature);
//! the wallet-private opening (v, r) and nullifier secret s never leave the
//! owning wallet.

use k256::ecdsa::signature::Verifier;
use k256::ecdsa::{Signature, VerifyingKey};
use k256::{ProjectivePoint, Scalar};

use crate::curve::{scalar_to_bytes, serialize_int, serialize_point, serialize_scalar_int};
use crate::Result;

/// local lifecycle state of a token inside a wallet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenState {
    Unspent,
    Spent,
    Expired,
}

/// a fixed-denomination cbdc token
///
/// bank-minted tokens carry a signature; tokens derived during an offline
/// spend carry none until reconciliation.
#[derive(Clone, Debug)]
pub struct Token {
    /// scalar identifier, unique within a wallet
    pub serial: Scalar,
    /// pedersen commitment C = v*G + r*H
    pub commitment: ProjectivePoint,
    /// absolute expiry, seconds since epoch
    pub expiry: u64,
    /// opaque bank signature over (serial, commitment, expiry), if minted
    pub signature: Option<Vec<u8>>,

    /// wallet-private: committed value
    pub v: u64,
    /// wallet-private: blinding factor
    pub r: Scalar,
    /// wallet-private: nullifier secret
    pub s: Scalar,
}

/// the message the bank signs when issuing a token:
/// serialize_int(serial) || serialize_point(commitment) || serialize_int(expiry)
pub(crate) fn token_signing_message(
    serial: &Scalar,
    commitment: &ProjectivePoint,
    expiry: u64,
) -> Result<Vec<u8>> {
    let mut message = Vec::with_capacity(128);
    message.extend_from_slice(&serialize_scalar_int(serial));
    message.extend_from_slice(&serialize_point(commitment)?);
    message.extend_from_slice(&serialize_int(expiry));
    Ok(message)
}

impl Token {
    /// deterministic serialization of the bank-signed fields
    pub fn serialize_for_signature(&self) -> Result<Vec<u8>> {
        token_signing_message(&self.serial, &self.commitment, self.expiry)
    }

    /// verify the bank's issuance signature over this token
    pub fn verify_bank_signature(&self, bank_key: &VerifyingKey) -> bool {
        let Some(signature) = &self.signature else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        let Ok(message) = self.serialize_for_signature() else {
            return false;
        };
        bank_key.verify(&message, &signature).is_ok()
    }

    /// whether the token is expired at the given time
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expiry
    }

    /// canonical 32-byte store key for the serial
    pub fn serial_bytes(&self) -> [u8; 32] {
        scalar_to_bytes(&self.serial)
    }
}

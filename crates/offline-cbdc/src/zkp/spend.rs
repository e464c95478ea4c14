//! spend ownership proofs
//!
//! a spend publishes the nullifier serial = s*G and proves, under a single
//! fiat-shamir challenge, knowledge of the commitment opening (v, r) and of
//! the nullifier secret s. the joint challenge prevents splicing a valid
//! commitment proof onto an unrelated nullifier.

use k256::{ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::curve::{
    hash_to_scalar, pedersen_h, random_scalar, serialize_point, serialize_scalar_int, G,
};
use crate::Result;

/// derive the public nullifier for a wallet secret: serial = s*G
pub fn derive_serial(secret: &Scalar) -> ProjectivePoint {
    G * secret
}

/// joint sigma proof of a commitment opening and a nullifier discrete log
#[derive(Clone, Debug, PartialEq)]
pub struct SpendProof {
    /// ephemeral commitment over the opening: A_commit = k_v*G + k_r*H
    pub a_commit: ProjectivePoint,
    /// ephemeral commitment over the nullifier: A_serial = k_s*G
    pub a_serial: ProjectivePoint,
    /// response z_v = k_v + e*v
    pub z_v: Scalar,
    /// response z_r = k_r + e*r
    pub z_r: Scalar,
    /// response z_s = k_s + e*s
    pub z_s: Scalar,
}

impl SpendProof {
    /// canonical transcript encoding: fields in fixed order
    /// (a_commit, a_serial, z_r, z_s, z_v)
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&serialize_point(&self.a_commit)?);
        bytes.extend_from_slice(&serialize_point(&self.a_serial)?);
        bytes.extend_from_slice(&serialize_scalar_int(&self.z_r));
        bytes.extend_from_slice(&serialize_scalar_int(&self.z_s));
        bytes.extend_from_slice(&serialize_scalar_int(&self.z_v));
        Ok(bytes)
    }

    /// SHA-256 of the canonical encoding
    pub fn transcript_digest(&self) -> Result<[u8; 32]> {
        Ok(Sha256::digest(self.canonical_bytes()?).into())
    }
}

/// challenge binds both ephemeral commitments, the token commitment, and the
/// nullifier, in this order
fn spend_challenge(
    a_commit: &ProjectivePoint,
    a_serial: &ProjectivePoint,
    commitment: &ProjectivePoint,
    serial: &ProjectivePoint,
) -> Result<Scalar> {
    let mut buf = Vec::with_capacity(256);
    buf.extend_from_slice(&serialize_point(a_commit)?);
    buf.extend_from_slice(&serialize_point(a_serial)?);
    buf.extend_from_slice(&serialize_point(commitment)?);
    buf.extend_from_slice(&serialize_point(serial)?);
    Ok(hash_to_scalar(&buf))
}

/// prove knowledge of (v, r, s) with C = v*G + r*H and serial = s*G
pub fn prove_spend_ownership<R: RngCore + CryptoRng>(
    value: u64,
    blinding: &Scalar,
    secret: &Scalar,
    commitment: &ProjectivePoint,
    serial: &ProjectivePoint,
    rng: &mut R,
) -> Result<SpendProof> {
    let k_v = random_scalar(rng);
    let k_r = random_scalar(rng);
    let k_s = random_scalar(rng);

    let a_commit = G * k_v + pedersen_h() * k_r;
    let a_serial = G * k_s;

    let e = spend_challenge(&a_commit, &a_serial, commitment, serial)?;

    Ok(SpendProof {
        a_commit,
        a_serial,
        z_v: k_v + e * Scalar::from(value),
        z_r: k_r + e * blinding,
        z_s: k_s + e * secret,
    })
}

/// verify both equations of the joint proof under the shared challenge
pub fn verify_spend_ownership(
    commitment: &ProjectivePoint,
    serial: &ProjectivePoint,
    proof: &SpendProof,
) -> bool {
    let Ok(e) = spend_challenge(&proof.a_commit, &proof.a_serial, commitment, serial) else {
        return false;
    };

    // commitment equation
    if G * proof.z_v + pedersen_h() * proof.z_r != proof.a_commit + *commitment * e {
        return false;
    }

    // serial equation
    G * proof.z_s == proof.a_serial + *serial * e
}

//! mint proofs: commitment opening and denomination membership
//!
//! the denomination proof is a disjunctive sigma proof: every branch except
//! the real denomination is simulated with a random challenge, and the real
//! branch absorbs the residual so that the branch challenges sum to the
//! transcript hash. the verifier learns that the committed value lies in the
//! allowed set without learning which element it is.

use k256::elliptic_curve::Field;
use k256::{ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::curve::{
    hash_to_scalar, pedersen_h, random_scalar, serialize_int, serialize_point,
    serialize_scalar_int, G,
};
use crate::{Error, Result};

/// the fixed public denomination set, in transcript iteration order
pub const ALLOWED_DENOMINATIONS: [u64; 7] = [1, 2, 5, 10, 20, 50, 100];

// =============================================================================
// Opening proof
// =============================================================================

/// sigma proof of knowledge of an opening (v, r) of C = v*G + r*H
#[derive(Clone, Debug, PartialEq)]
pub struct OpeningProof {
    /// ephemeral commitment A = k1*G + k2*H
    pub a: ProjectivePoint,
    /// response z1 = k1 + e*v
    pub z1: Scalar,
    /// response z2 = k2 + e*r
    pub z2: Scalar,
}

impl OpeningProof {
    /// canonical transcript encoding: fields in fixed order (a, z1, z2);
    /// points as 64-byte affine coordinates, scalars as minimum-length
    /// big-endian integers
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&serialize_point(&self.a)?);
        bytes.extend_from_slice(&serialize_scalar_int(&self.z1));
        bytes.extend_from_slice(&serialize_scalar_int(&self.z2));
        Ok(bytes)
    }

    /// SHA-256 of the canonical encoding
    pub fn transcript_digest(&self) -> Result<[u8; 32]> {
        Ok(Sha256::digest(self.canonical_bytes()?).into())
    }
}

fn opening_challenge(a: &ProjectivePoint, commitment: &ProjectivePoint) -> Result<Scalar> {
    let mut buf = Vec::with_capacity(128);
    buf.extend_from_slice(&serialize_point(a)?);
    buf.extend_from_slice(&serialize_point(commitment)?);
    Ok(hash_to_scalar(&buf))
}

/// prove knowledge of (v, r) such that C = v*G + r*H
pub fn prove_opening<R: RngCore + CryptoRng>(
    value: u64,
    blinding: &Scalar,
    commitment: &ProjectivePoint,
    rng: &mut R,
) -> Result<OpeningProof> {
    let k1 = random_scalar(rng);
    let k2 = random_scalar(rng);
    let a = G * k1 + pedersen_h() * k2;

    let e = opening_challenge(&a, commitment)?;

    Ok(OpeningProof {
        a,
        z1: k1 + e * Scalar::from(value),
        z2: k2 + e * blinding,
    })
}

/// verify an opening proof: z1*G + z2*H == A + e*C
pub fn verify_opening(commitment: &ProjectivePoint, proof: &OpeningProof) -> bool {
    let Ok(e) = opening_challenge(&proof.a, commitment) else {
        return false;
    };
    G * proof.z1 + pedersen_h() * proof.z2 == proof.a + *commitment * e
}

// =============================================================================
// Denomination OR-proof
// =============================================================================

/// per-denomination branch of the OR-proof
///
/// branches are indexed by position in [`ALLOWED_DENOMINATIONS`]; all but one
/// are simulations.
#[derive(Clone, Debug, PartialEq)]
pub struct DenominationBranch {
    /// branch commitment A_d
    pub a: ProjectivePoint,
    /// branch response z1_d
    pub z1: Scalar,
    /// branch response z2_d
    pub z2: Scalar,
    /// branch challenge e_d
    pub e: Scalar,
}

/// disjunctive proof that a commitment opens to one of the allowed
/// denominations
#[derive(Clone, Debug, PartialEq)]
pub struct DenominationProof {
    pub branches: [DenominationBranch; ALLOWED_DENOMINATIONS.len()],
}

impl DenominationProof {
    /// canonical transcript encoding: conceptual mapping fields in fixed
    /// order (a, e, z1, z2), each iterated in ascending denomination order
    /// with the denomination emitted before the branch value
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        for (d, branch) in ALLOWED_DENOMINATIONS.iter().zip(&self.branches) {
            bytes.extend_from_slice(&serialize_int(*d));
            bytes.extend_from_slice(&serialize_point(&branch.a)?);
        }
        for (d, branch) in ALLOWED_DENOMINATIONS.iter().zip(&self.branches) {
            bytes.extend_from_slice(&serialize_int(*d));
            bytes.extend_from_slice(&serialize_scalar_int(&branch.e));
        }
        for (d, branch) in ALLOWED_DENOMINATIONS.iter().zip(&self.branches) {
            bytes.extend_from_slice(&serialize_int(*d));
            bytes.extend_from_slice(&serialize_scalar_int(&branch.z1));
        }
        for (d, branch) in ALLOWED_DENOMINATIONS.iter().zip(&self.branches) {
            bytes.extend_from_slice(&serialize_int(*d));
            bytes.extend_from_slice(&serialize_scalar_int(&branch.z2));
        }
        Ok(bytes)
    }

    /// SHA-256 of the canonical encoding
    pub fn transcript_digest(&self) -> Result<[u8; 32]> {
        Ok(Sha256::digest(self.canonical_bytes()?).into())
    }
}

/// overall challenge: hash of every branch commitment in denomination order,
/// then the commitment under proof
fn denomination_challenge(
    branches: &[DenominationBranch; ALLOWED_DENOMINATIONS.len()],
    commitment: &ProjectivePoint,
) -> Result<Scalar> {
    let mut buf = Vec::with_capacity(64 * (ALLOWED_DENOMINATIONS.len() + 1));
    for branch in branches {
        buf.extend_from_slice(&serialize_point(&branch.a)?);
    }
    buf.extend_from_slice(&serialize_point(commitment)?);
    Ok(hash_to_scalar(&buf))
}

/// prove that C = v*G + r*H commits to an allowed denomination
pub fn prove_minting<R: RngCore + CryptoRng>(
    value: u64,
    blinding: &Scalar,
    commitment: &ProjectivePoint,
    rng: &mut R,
) -> Result<DenominationProof> {
    let Some(real) = ALLOWED_DENOMINATIONS.iter().position(|&d| d == value) else {
        return Err(Error::InvalidInput("value is not an allowed denomination"));
    };

    let mut branches = ALLOWED_DENOMINATIONS.map(|_| DenominationBranch {
        a: ProjectivePoint::IDENTITY,
        z1: Scalar::ZERO,
        z2: Scalar::ZERO,
        e: Scalar::ZERO,
    });

    // simulate every branch except the real denomination: random challenge
    // and responses, commitment back-solved from the verification equation
    for (i, branch) in branches.iter_mut().enumerate() {
        if i == real {
            continue;
        }
        let e = random_scalar(rng);
        let z1 = random_scalar(rng);
        let z2 = random_scalar(rng);
        branch.a = G * z1 + pedersen_h() * z2 - *commitment * e;
        branch.z1 = z1;
        branch.z2 = z2;
        branch.e = e;
    }

    // honest commitment for the real branch
    let k1 = random_scalar(rng);
    let k2 = random_scalar(rng);
    branches[real].a = G * k1 + pedersen_h() * k2;

    let e = denomination_challenge(&branches, commitment)?;

    // the real branch absorbs the residual challenge
    let e_other = branches
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != real)
        .fold(Scalar::ZERO, |acc, (_, b)| acc + b.e);
    let e_real = e - e_other;

    branches[real].e = e_real;
    branches[real].z1 = k1 + e_real * Scalar::from(value);
    branches[real].z2 = k2 + e_real * blinding;

    Ok(DenominationProof { branches })
}

/// verify a denomination proof: every branch equation must hold and the
/// branch challenges must sum to the transcript challenge
pub fn verify_minting(commitment: &ProjectivePoint, proof: &DenominationProof) -> bool {
    for branch in &proof.branches {
        if G * branch.z1 + pedersen_h() * branch.z2 != branch.a + *commitment * branch.e {
            return false;
        }
    }

    let Ok(e) = denomination_challenge(&proof.branches, commitment) else {
        return false;
    };
    let e_sum = proof
        .branches
        .iter()
        .fold(Scalar::ZERO, |acc, b| acc + b.e);
    e_sum == e
}

//! recursive invariant proofs over the wallet proof-state
//!
//! the public statement is D = C_out_total - C_in_total; the witness is
//! rho = r_out_total - r_in_total. a standard discrete-log sigma proof shows
//! D = rho*H, i.e. no stray G component has accumulated anywhere in the
//! wallet's history of mints and spends.

use k256::{ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::curve::{
    hash_to_scalar, pedersen_h, random_scalar, serialize_point, serialize_scalar_int,
};
use crate::state::ProofState;
use crate::Result;

/// sigma proof that the proof-state difference lies in the subgroup
/// generated by H
#[derive(Clone, Debug, PartialEq)]
pub struct RecursiveInvariantProof {
    /// ephemeral commitment A = k*H
    pub a: ProjectivePoint,
    /// response z = k + e*rho
    pub z: Scalar,
}

impl RecursiveInvariantProof {
    /// canonical transcript encoding: fields in fixed order (a, z)
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&serialize_point(&self.a)?);
        bytes.extend_from_slice(&serialize_scalar_int(&self.z));
        Ok(bytes)
    }

    /// SHA-256 of the canonical encoding
    pub fn transcript_digest(&self) -> Result<[u8; 32]> {
        Ok(Sha256::digest(self.canonical_bytes()?).into())
    }
}

fn invariant_challenge(a: &ProjectivePoint, d: &ProjectivePoint) -> Result<Scalar> {
    let mut buf = Vec::with_capacity(128);
    buf.extend_from_slice(&serialize_point(a)?);
    buf.extend_from_slice(&serialize_point(d)?);
    Ok(hash_to_scalar(&buf))
}

/// prove C_out_total - C_in_total = rho*H for the wallet's current state
///
/// the statement must be non-trivial: a state whose difference is the
/// identity (an untouched wallet) has nothing to prove and is rejected as
/// invalid input.
pub fn prove_recursive_invariant<R: RngCore + CryptoRng>(
    state: &ProofState,
    rng: &mut R,
) -> Result<RecursiveInvariantProof> {
    let d = state.c_out_total - state.c_in_total;
    let rho = state.r_out_total - state.r_in_total;

    let k = random_scalar(rng);
    let a = pedersen_h() * k;

    let e = invariant_challenge(&a, &d)?;

    Ok(RecursiveInvariantProof { a, z: k + e * rho })
}

/// verify a recursive invariant proof against the wallet state: z*H == A + e*D
pub fn verify_recursive_invariant(state: &ProofState, proof: &RecursiveInvariantProof) -> bool {
    let d = state.c_out_total - state.c_in_total;
    let Ok(e) = invariant_challenge(&proof.a, &d) else {
        return false;
    };
    pedersen_h() * proof.z == proof.a + d * e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::commit;
    use crate::curve::G;
    use crate::token::Token;
    use k256::elliptic_curve::Field;
    use rand::rngs::OsRng;

    fn make_token(v: u64) -> Token {
        let mut rng = OsRng;
        let r = random_scalar(&mut rng);
        Token {
            serial: random_scalar(&mut rng),
            commitment: commit(v, &r),
            expiry: u64::MAX,
            signature: None,
            v,
            r,
            s: random_scalar(&mut rng),
        }
    }

    fn spent_state() -> ProofState {
        let t0 = make_token(50);
        let mut state = ProofState::init_from_mint(std::slice::from_ref(&t0));
        state.update_from_spend(std::slice::from_ref(&t0), &[make_token(30), make_token(20)]);
        state
    }

    #[test]
    fn test_recursive_invariant_roundtrip() {
        let mut rng = OsRng;
        let state = spent_state();

        let proof = prove_recursive_invariant(&state, &mut rng).unwrap();
        assert!(verify_recursive_invariant(&state, &proof));
    }

    #[test]
    fn test_recursive_invariant_detects_tampered_state() {
        let mut rng = OsRng;
        let mut state = spent_state();

        let proof = prove_recursive_invariant(&state, &mut rng).unwrap();
        state.c_out_total += G;
        assert!(!verify_recursive_invariant(&state, &proof));
    }

    #[test]
    fn test_recursive_invariant_detects_tampered_proof() {
        let mut rng = OsRng;
        let state = spent_state();

        let mut proof = prove_recursive_invariant(&state, &mut rng).unwrap();
        proof.z += Scalar::ONE;
        assert!(!verify_recursive_invariant(&state, &proof));
    }

    #[test]
    fn test_unbalanced_history_yields_invalid_proof() {
        let mut rng = OsRng;
        let t0 = make_token(50);
        let mut state = ProofState::init_from_mint(std::slice::from_ref(&t0));
        // 50 -> 40 + 20: conservation violated, D keeps a G component
        state.update_from_spend(std::slice::from_ref(&t0), &[make_token(40), make_token(20)]);

        let proof = prove_recursive_invariant(&state, &mut rng).unwrap();
        assert!(!verify_recursive_invariant(&state, &proof));
    }

    #[test]
    fn test_proof_over_chained_spends() {
        let mut rng = OsRng;
        let t0 = make_token(100);
        let mut state = ProofState::init_from_mint(std::slice::from_ref(&t0));

        let t1 = make_token(60);
        state.update_from_spend(std::slice::from_ref(&t0), &[t1.clone(), make_token(40)]);
        state.update_from_spend(std::slice::from_ref(&t1), &[make_token(25), make_token(35)]);

        let proof = prove_recursive_invariant(&state, &mut rng).unwrap();
        assert!(verify_recursive_invariant(&state, &proof));
    }
}

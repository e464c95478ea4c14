//! wallet-side spend transcript
//!
//! a versioned canonical hash over everything a spend produced: the spent
//! nullifiers, input and output commitments, output expiries, and the
//! digests of all three proofs. used when handing a spend to reconciliation
//! transport; distinct from the device authorization transcript, which
//! carries no version tag and binds a freshness nonce instead.

use k256::ProjectivePoint;
use sha2::{Digest, Sha256};

use crate::curve::{serialize_int, serialize_point, POINT_LEN};
use crate::token::Token;
use crate::zkp::{RecursiveInvariantProof, SpendProof, ValueProof};
use crate::Result;

/// leading version tag of the wallet spend transcript
pub const SPEND_TRANSCRIPT_VERSION: &[u8] = b"offline-cbdc-spend-v1";

fn sorted_encodings(points: &[ProjectivePoint]) -> Result<Vec<[u8; POINT_LEN]>> {
    let mut encodings = points
        .iter()
        .map(serialize_point)
        .collect::<Result<Vec<_>>>()?;
    encodings.sort_unstable();
    Ok(encodings)
}

/// build the canonical wallet spend transcript hash
pub fn build_spend_transcript(
    spend_serials: &[ProjectivePoint],
    input_commitments: &[ProjectivePoint],
    output_tokens: &[Token],
    spend_proof: &SpendProof,
    value_proof: &ValueProof,
    recursive_proof: &RecursiveInvariantProof,
) -> Result<[u8; 32]> {
    let mut transcript = Sha256::new();
    transcript.update(SPEND_TRANSCRIPT_VERSION);

    for encoding in sorted_encodings(spend_serials)? {
        transcript.update(encoding);
    }
    for encoding in sorted_encodings(input_commitments)? {
        transcript.update(encoding);
    }

    // outputs ordered by commitment encoding, each bound with its expiry
    let mut outputs = output_tokens
        .iter()
        .map(|token| Ok((serialize_point(&token.commitment)?, token.expiry)))
        .collect::<Result<Vec<([u8; POINT_LEN], u64)>>>()?;
    outputs.sort_unstable();
    for (encoding, expiry) in outputs {
        transcript.update(encoding);
        transcript.update(&serialize_int(expiry));
    }

    transcript.update(spend_proof.transcript_digest()?);
    transcript.update(value_proof.transcript_digest()?);
    transcript.update(recursive_proof.transcript_digest()?);

    Ok(transcript.finalize().into())
}

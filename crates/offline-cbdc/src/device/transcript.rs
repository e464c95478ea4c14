//! device authorization transcripts
//!
//! the device signs a single 32-byte hash binding the spent nullifiers, the
//! output commitments, the spend and value proofs, and a freshness nonce.
//! point lists are sorted by their canonical encodings so the transcript is
//! independent of presentation order.

use k256::ProjectivePoint;
use sha2::{Digest, Sha256};

use crate::curve::{serialize_point, POINT_LEN};
use crate::device::certificate::{verify_device_certificate, DeviceCertificate};
use crate::device::schnorr;
use crate::zkp::{SpendProof, ValueBundle};
use crate::Result;

fn sorted_point_bytes(points: &[ProjectivePoint]) -> Result<Vec<u8>> {
    let mut encodings = points
        .iter()
        .map(serialize_point)
        .collect::<Result<Vec<[u8; POINT_LEN]>>>()?;
    encodings.sort_unstable();

    let mut bytes = Vec::with_capacity(encodings.len() * POINT_LEN);
    for encoding in encodings {
        bytes.extend_from_slice(&encoding);
    }
    Ok(bytes)
}

/// build the 32-byte spend authorization transcript
pub fn build_authorization_transcript(
    nullifiers: &[ProjectivePoint],
    output_commitments: &[ProjectivePoint],
    spend_proofs: &[(ProjectivePoint, SpendProof)],
    value_bundle: &ValueBundle,
    nonce: &[u8; 32],
) -> Result<[u8; 32]> {
    let serial_bytes = sorted_point_bytes(nullifiers)?;
    let commitment_bytes = sorted_point_bytes(output_commitments)?;

    // spend proofs hashed with their input commitments, in bundle order
    let mut spend_hasher = Sha256::new();
    for (commitment, proof) in spend_proofs {
        spend_hasher.update(serialize_point(commitment)?);
        spend_hasher.update(proof.canonical_bytes()?);
    }
    let spend_proof_bytes: [u8; 32] = spend_hasher.finalize().into();

    let mut value_hasher = Sha256::new();
    value_hasher.update(serialize_point(&value_bundle.c_in)?);
    value_hasher.update(serialize_point(&value_bundle.c_out)?);
    value_hasher.update(serialize_point(&value_bundle.c_change)?);
    value_hasher.update(value_bundle.proof.canonical_bytes()?);
    let value_proof_bytes: [u8; 32] = value_hasher.finalize().into();

    let mut transcript = Sha256::new();
    transcript.update(&serial_bytes);
    transcript.update(&commitment_bytes);
    transcript.update(spend_proof_bytes);
    transcript.update(value_proof_bytes);
    transcript.update(nonce);
    Ok(transcript.finalize().into())
}

/// verify that a registered device authorized an offline spend
///
/// checks the device certificate against the bank key, then the device
/// schnorr signature over the transcript.
pub fn verify_spend_authorization(
    transcript_hash: &[u8],
    device_signature: &[u8],
    certificate: &DeviceCertificate,
    pk_bank: &ProjectivePoint,
    now: u64,
) -> bool {
    if transcript_hash.len() != 32 {
        return false;
    }
    if !verify_device_certificate(certificate, pk_bank, now) {
        return false;
    }
    schnorr::verify(&certificate.pk_device, device_signature, transcript_hash)
}

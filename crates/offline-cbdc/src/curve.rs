//! secp256k1 group layer
//!
//! fixes the curve, derives the second pedersen generator H with an unknown
//! discrete log relative to G, and provides the canonical point and scalar
//! encodings every transcript in the protocol hashes over.

use std::sync::OnceLock;

use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::{Field, Group, PrimeField};
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar, U256};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// domain separation tag for deriving the second pedersen generator
pub const PEDERSEN_H_TAG: &[u8] = b"offline-cbdc-pedersen-H";

/// the group generator G
pub const G: ProjectivePoint = ProjectivePoint::GENERATOR;

/// canonical point encoding length: be32(x) || be32(y)
pub const POINT_LEN: usize = 64;

/// fixed-width scalar encoding length: 32-byte big-endian
pub const SCALAR_LEN: usize = 32;

static H_CELL: OnceLock<ProjectivePoint> = OnceLock::new();

/// the second pedersen generator H = hash_to_scalar(tag) * G
///
/// nobody knows log_G(H); this is the binding assumption for pedersen
/// commitments. derived once, cached for the process lifetime.
pub fn pedersen_h() -> ProjectivePoint {
    *H_CELL.get_or_init(|| G * hash_to_scalar(PEDERSEN_H_TAG))
}

/// map arbitrary bytes to a scalar: SHA-256(data) mod q, big-endian
///
/// used for every fiat-shamir challenge and for deterministic derived-token
/// serials.
pub fn hash_to_scalar(data: &[u8]) -> Scalar {
    let digest = Sha256::digest(data);
    <Scalar as Reduce<U256>>::reduce(U256::from_be_slice(&digest))
}

/// uniform random scalar in [0, q)
pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    Scalar::random(rng)
}

/// canonical point encoding: be32(x) || be32(y), affine, uncompressed
///
/// the identity has no affine coordinates; callers must ensure the point is
/// non-identity before serializing.
pub fn serialize_point(point: &ProjectivePoint) -> Result<[u8; POINT_LEN]> {
    if bool::from(point.is_identity()) {
        return Err(Error::InvalidInput("cannot serialize the identity point"));
    }
    let encoded = point.to_affine().to_encoded_point(false);
    let mut bytes = [0u8; POINT_LEN];
    // skip the SEC1 0x04 uncompressed prefix
    bytes.copy_from_slice(&encoded.as_bytes()[1..]);
    Ok(bytes)
}

/// decode a canonical 64-byte point encoding
///
/// returns `None` if (x, y) is not on the curve.
pub fn deserialize_point(bytes: &[u8; POINT_LEN]) -> Option<ProjectivePoint> {
    let x = FieldBytes::from_slice(&bytes[..32]);
    let y = FieldBytes::from_slice(&bytes[32..]);
    let encoded = EncodedPoint::from_affine_coordinates(x, y, false);
    Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
        .map(ProjectivePoint::from)
}

/// fixed-width scalar encoding: 32-byte big-endian
pub fn scalar_to_bytes(scalar: &Scalar) -> [u8; SCALAR_LEN] {
    scalar.to_bytes().into()
}

/// decode a canonical 32-byte scalar; `None` if not in [0, q)
pub fn scalar_from_bytes(bytes: &[u8; SCALAR_LEN]) -> Option<Scalar> {
    Option::from(Scalar::from_repr((*bytes).into()))
}

/// decode a 32-byte big-endian integer, reducing mod q
pub fn scalar_reduce(bytes: &[u8; SCALAR_LEN]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce(U256::from_be_slice(bytes))
}

/// minimum-length big-endian encoding of a non-negative integer
///
/// zero encodes as the empty string.
pub fn serialize_int(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    bytes[skip..].to_vec()
}

/// minimum-length big-endian encoding of a scalar viewed as an integer
///
/// used wherever the canonical proof encoding calls for an integer rather
/// than a fixed-width scalar.
pub fn serialize_scalar_int(scalar: &Scalar) -> Vec<u8> {
    let bytes = scalar_to_bytes(scalar);
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    bytes[skip..].to_vec()
}

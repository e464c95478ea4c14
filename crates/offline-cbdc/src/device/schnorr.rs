//! schnorr signatures over the secp256k1 group
//!
//! shared by bank certificate issuance and device spend authorization.
//! wire format: serialize_point(R) || be32(z), 96 bytes fixed.

use k256::elliptic_curve::Field;
use k256::{ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};

use crate::curve::{
    deserialize_point, hash_to_scalar, random_scalar, scalar_reduce, scalar_to_bytes,
    serialize_point, G, POINT_LEN,
};
use crate::{Error, Result};

/// fixed signature length: 64-byte point plus 32-byte scalar
pub const SIGNATURE_LEN: usize = 96;

fn challenge(r_bytes: &[u8; POINT_LEN], message: &[u8]) -> Scalar {
    let mut buf = Vec::with_capacity(POINT_LEN + message.len());
    buf.extend_from_slice(r_bytes);
    buf.extend_from_slice(message);
    hash_to_scalar(&buf)
}

/// sign a message: R = k*G, e = H(R || message), z = k + e*sk
pub fn sign<R: RngCore + CryptoRng>(
    secret_key: &Scalar,
    message: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let k = random_scalar(rng);
    if bool::from(k.is_zero()) {
        return Err(Error::InvalidInput("schnorr nonce is zero"));
    }

    let r_point = G * k;
    let r_bytes = serialize_point(&r_point)?;

    let e = challenge(&r_bytes, message);
    let z = k + e * secret_key;

    let mut signature = Vec::with_capacity(SIGNATURE_LEN);
    signature.extend_from_slice(&r_bytes);
    signature.extend_from_slice(&scalar_to_bytes(&z));
    Ok(signature)
}

/// verify a signature: z*G == R + e*pk
pub fn verify(public_key: &ProjectivePoint, signature: &[u8], message: &[u8]) -> bool {
    if signature.len() != SIGNATURE_LEN {
        return false;
    }

    let mut r_bytes = [0u8; POINT_LEN];
    r_bytes.copy_from_slice(&signature[..POINT_LEN]);
    let Some(r_point) = deserialize_point(&r_bytes) else {
        return false;
    };

    let mut z_bytes = [0u8; 32];
    z_bytes.copy_from_slice(&signature[POINT_LEN..]);
    let z = scalar_reduce(&z_bytes);

    let e = challenge(&r_bytes, message);
    G * z == r_point + *public_key * e
}

//! pedersen commitments over the secp256k1 group
//!
//! C = v*G + r*H. perfectly hiding in r, computationally binding under the
//! discrete-log assumption between G and H.

use k256::{ProjectivePoint, Scalar};

use crate::curve::{pedersen_h, G};

/// commit to a value with blinding factor r: C = v*G + r*H
///
/// `v: u64` and a reduced `Scalar` carry the range preconditions, so the
/// mapping is total.
pub fn commit(value: u64, blinding: &Scalar) -> ProjectivePoint {
    G * Scalar::from(value) + pedersen_h() * blinding
}

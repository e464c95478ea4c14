//! wallet device cryptographic identity

use k256::elliptic_curve::Field;
use k256::{ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::curve::{random_scalar, G};
use crate::device::schnorr;
use crate::{Error, Result};

/// a wallet device keypair
///
/// the secret key is assumed to live in a trusted enclave; this type models
/// that boundary in software and zeroizes the secret on drop.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct DeviceIdentity {
    pub(crate) sk_device: Scalar,
    /// public verification key pk_device = sk_device * G
    #[zeroize(skip)]
    pub pk_device: ProjectivePoint,
}

impl DeviceIdentity {
    /// generate a fresh device identity with sk_device in [1, q)
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let sk_device = random_scalar(rng);
        if bool::from(sk_device.is_zero()) {
            return Err(Error::InvalidInput("device secret key is zero"));
        }
        let pk_device = G * sk_device;
        Ok(Self {
            sk_device,
            pk_device,
        })
    }

    /// sign a 32-byte spend authorization transcript
    pub fn sign_spend_transcript<R: RngCore + CryptoRng>(
        &self,
        transcript_hash: &[u8],
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        if transcript_hash.len() != 32 {
            return Err(Error::InvalidInput("transcript hash must be 32 bytes"));
        }
        schnorr::sign(&self.sk_device, transcript_hash, rng)
    }
}

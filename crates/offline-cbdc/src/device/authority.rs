//! issuing authority keys and device certificate issuance

use k256::elliptic_curve::Field;
use k256::{ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::curve::{random_scalar, G};
use crate::device::certificate::{certificate_message, DeviceCertificate};
use crate::device::schnorr;
use crate::{Error, Result};

/// the bank's schnorr keypair for certifying wallet devices
///
/// distinct from the ecdsa issuance key used to sign minted tokens; both are
/// plain values the host passes in, never global state.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct BankAuthority {
    pub(crate) sk_bank: Scalar,
    /// public verification key pk_bank = sk_bank * G
    #[zeroize(skip)]
    pub pk_bank: ProjectivePoint,
}

impl BankAuthority {
    /// generate a fresh bank authority keypair with sk_bank in [1, q)
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let sk_bank = random_scalar(rng);
        if bool::from(sk_bank.is_zero()) {
            return Err(Error::InvalidInput("bank secret key is zero"));
        }
        let pk_bank = G * sk_bank;
        Ok(Self { sk_bank, pk_bank })
    }

    /// issue a signed certificate binding a device key to spending authority
    pub fn issue_device_certificate<R: RngCore + CryptoRng>(
        &self,
        pk_device: &ProjectivePoint,
        cert_id: &[u8],
        issued_at: u64,
        expires_at: u64,
        rng: &mut R,
    ) -> Result<DeviceCertificate> {
        if expires_at <= issued_at {
            return Err(Error::InvalidInput("certificate expires before issuance"));
        }

        let message = certificate_message(pk_device, cert_id, issued_at, expires_at)?;
        let signature = schnorr::sign(&self.sk_bank, &message, rng)?;

        Ok(DeviceCertificate {
            pk_device: *pk_device,
            cert_id: cert_id.to_vec(),
            issued_at,
            expires_at,
            signature: Some(signature),
        })
    }
}

//! bank-issued device certificates

use k256::ProjectivePoint;

use crate::curve::serialize_point;
use crate::device::schnorr;
use crate::{Error, Result};

/// certificate binding a device public key to bank-granted spending
/// authority over a validity window
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceCertificate {
    /// the certified device verification key
    pub pk_device: ProjectivePoint,
    /// bank-assigned certificate identifier
    pub cert_id: Vec<u8>,
    /// issuance time, seconds since epoch
    pub issued_at: u64,
    /// expiry time, seconds since epoch
    pub expires_at: u64,
    /// bank schnorr signature over the certificate message, if issued
    pub signature: Option<Vec<u8>>,
}

/// the signed certificate message:
/// serialize_point(pk_device) || cert_id || be8(issued_at) || be8(expires_at)
pub(crate) fn certificate_message(
    pk_device: &ProjectivePoint,
    cert_id: &[u8],
    issued_at: u64,
    expires_at: u64,
) -> Result<Vec<u8>> {
    let mut message = Vec::with_capacity(80 + cert_id.len());
    message.extend_from_slice(&serialize_point(pk_device)?);
    message.extend_from_slice(cert_id);
    message.extend_from_slice(&issued_at.to_be_bytes());
    message.extend_from_slice(&expires_at.to_be_bytes());
    Ok(message)
}

impl DeviceCertificate {
    /// strict freshness check for the sender-side path: a wallet refuses to
    /// authorize spends under a stale or unsigned certificate
    pub fn ensure_fresh(&self, now: u64) -> Result<()> {
        if now > self.expires_at {
            return Err(Error::ExpiredCertificate);
        }
        if self.signature.is_none() {
            return Err(Error::InvalidSignature);
        }
        Ok(())
    }
}

/// verify a device certificate against the bank's public key
///
/// rejects expired certificates, absent signatures, and signatures that fail
/// the schnorr equation.
pub fn verify_device_certificate(
    cert: &DeviceCertificate,
    pk_bank: &ProjectivePoint,
    now: u64,
) -> bool {
    if now > cert.expires_at {
        return false;
    }
    let Some(signature) = &cert.signature else {
        return false;
    };
    let Ok(message) =
        certificate_message(&cert.pk_device, &cert.cert_id, cert.issued_at, cert.expires_at)
    else {
        return false;
    };
    schnorr::verify(pk_bank, signature, &message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::authority::BankAuthority;
    use crate::device::identity::DeviceIdentity;
    use rand::rngs::OsRng;

    fn issued_cert() -> (BankAuthority, DeviceCertificate) {
        let mut rng = OsRng;
        let bank = BankAuthority::generate(&mut rng).unwrap();
        let device = DeviceIdentity::generate(&mut rng).unwrap();
        let cert = bank
            .issue_device_certificate(&device.pk_device, b"cert-7", 1_000, 2_000, &mut rng)
            .unwrap();
        (bank, cert)
    }

    #[test]
    fn test_fresh_certificate_verifies() {
        let (bank, cert) = issued_cert();
        assert!(verify_device_certificate(&cert, &bank.pk_bank, 1_999));
        assert!(verify_device_certificate(&cert, &bank.pk_bank, 2_000));
    }

    #[test]
    fn test_expired_certificate_rejected() {
        let (bank, cert) = issued_cert();
        assert!(!verify_device_certificate(&cert, &bank.pk_bank, 2_001));
        assert!(matches!(
            cert.ensure_fresh(2_001),
            Err(Error::ExpiredCertificate)
        ));
    }

    #[test]
    fn test_absent_signature_rejected() {
        let (bank, mut cert) = issued_cert();
        cert.signature = None;
        assert!(!verify_device_certificate(&cert, &bank.pk_bank, 1_500));
        assert!(matches!(
            cert.ensure_fresh(1_500),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn test_tampered_certificate_rejected() {
        let (bank, cert) = issued_cert();

        let mut tampered = cert.clone();
        tampered.cert_id = b"cert-8".to_vec();
        assert!(!verify_device_certificate(&tampered, &bank.pk_bank, 1_500));

        let mut tampered = cert.clone();
        tampered.expires_at += 1_000_000;
        assert!(!verify_device_certificate(&tampered, &bank.pk_bank, 1_500));

        let mut tampered = cert;
        if let Some(sig) = &mut tampered.signature {
            sig[0] ^= 0x01;
        }
        assert!(!verify_device_certificate(&tampered, &bank.pk_bank, 1_500));
    }

    #[test]
    fn test_wrong_bank_key_rejected() {
        let mut rng = OsRng;
        let (_, cert) = issued_cert();
        let other = BankAuthority::generate(&mut rng).unwrap();
        assert!(!verify_device_certificate(&cert, &other.pk_bank, 1_500));
    }
}

//! device authorization layer
//!
//! a bank schnorr key certifies wallet device keys; a certified device signs
//! the canonical spend transcript to authorize each offline spend. receivers
//! check the certificate chain before trusting the signature.

pub mod authority;
pub mod certificate;
pub mod identity;
pub mod schnorr;
pub mod transcript;

pub use authority::BankAuthority;
pub use certificate::{verify_device_certificate, DeviceCertificate};
pub use identity::DeviceIdentity;
pub use transcript::{build_authorization_transcript, verify_spend_authorization};

//! offline cbdc wallet cryptographic core
//!
//! lets an issuing authority mint fixed-denomination tokens, lets wallet
//! devices spend them privately and offline, and lets a receiving wallet
//! verify that an offline spend is authorized, value-conserving, and bound
//! to a registered device, without learning token values or blinding
//! factors.
//!
//! # Building blocks
//!
//! - pedersen commitments over secp256k1 with a derived second generator H
//! - four fiat-shamir sigma protocols: commitment opening, denomination
//!   OR-proof, joint spend ownership (commitment + nullifier), and value
//!   conservation
//! - a recursive invariant proof tying every past mint and spend into one
//!   relation over the running proof-state
//! - schnorr device certificates and spend-transcript signatures
//! - the wallet-side two-phase spend builder and the receiver-side verifier
//!
//! # Example
//!
//! ```ignore
//! use offline_cbdc::{Bank, MintPolicy, TokenLifecycle};
//!
//! let mut bank = Bank::generate(MintPolicy::default(), &mut rng);
//! let mut wallet = TokenLifecycle::new();
//!
//! let key = *bank.verifying_key();
//! let token = wallet.mint(50, &mut bank, &key, now, &mut rng)?;
//! let bundle = wallet.spend(&token.serial, 30, 20, expiry, now, &mut rng)?;
//! ```
//!
//! provers raise on precondition violations; verifiers return `bool` and
//! never raise on malformed proofs. the core reads no clock and spawns no
//! threads: hosts supply `now` and wrap a shared wallet in their own
//! critical section.

pub mod bank;
pub mod commitment;
pub mod curve;
pub mod device;
pub mod state;
pub mod token;
pub mod transaction;
pub mod wallet;
pub mod zkp;

mod error;

#[cfg(test)]
mod tests;

pub use bank::{Bank, BankMint, BankToken, MintPolicy, DEFAULT_TOKEN_TTL};
pub use commitment::commit;
pub use device::{BankAuthority, DeviceCertificate, DeviceIdentity};
pub use error::{Error, Result};
pub use state::ProofState;
pub use token::{Token, TokenState};
pub use transaction::{
    accept_offline_transaction, authorize_spend, verify_offline_transaction,
    OfflineTransaction, ReceiverState, SpentSerialDb,
};
pub use wallet::{PendingStore, SpendBundle, TokenLifecycle, TokenStore};
pub use zkp::{
    DenominationProof, OpeningProof, RecursiveInvariantProof, SpendProof, ValueBundle,
    ValueProof, ALLOWED_DENOMINATIONS,
};

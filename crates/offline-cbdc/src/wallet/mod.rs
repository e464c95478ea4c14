//! wallet-side state and orchestration
//!
//! the token store, the pending-spend ledger, the lifecycle builder that
//! keeps all three consistent, and the wallet spend transcript.

pub mod lifecycle;
pub mod pending_store;
pub mod spend_transcript;
pub mod token_store;

pub use lifecycle::{SpendBundle, TokenLifecycle};
pub use pending_store::{PendingSpend, PendingStore};
pub use spend_transcript::{build_spend_transcript, SPEND_TRANSCRIPT_VERSION};
pub use token_store::TokenStore;

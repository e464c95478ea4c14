//! fiat-shamir sigma protocols
//!
//! all proofs share the same three-move shape: ephemeral commitment,
//! SHA-256 transcript challenge, linear response. provers raise on
//! precondition violations; verifiers return `bool` and never raise on a
//! malformed proof.

pub mod mint;
pub mod recursive;
pub mod spend;
pub mod value;

pub use mint::{
    prove_minting, prove_opening, verify_minting, verify_opening, DenominationBranch,
    DenominationProof, OpeningProof, ALLOWED_DENOMINATIONS,
};
pub use recursive::{
    prove_recursive_invariant, verify_recursive_invariant, RecursiveInvariantProof,
};
pub use spend::{derive_serial, prove_spend_ownership, verify_spend_ownership, SpendProof};
pub use value::{prove_value_conservation, verify_value_conservation, ValueBundle, ValueProof};

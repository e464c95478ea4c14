//! running wallet proof-state
//!
//! four aggregates tie every past mint and spend into one algebraic
//! relation: for an honest wallet whose spends conserve value,
//! C_out_total - C_in_total = (r_out_total - r_in_total) * H after every
//! spend. the recursive invariant proof demonstrates exactly this.

use k256::elliptic_curve::{Field, Group};
use k256::{ProjectivePoint, Scalar};

use crate::token::Token;

/// the running aggregate over a wallet's history
///
/// mutated only through [`ProofState::init_from_mint`] and
/// [`ProofState::update_from_spend`].
#[derive(Clone, Debug, PartialEq)]
pub struct ProofState {
    /// sum of consumed input commitments
    pub c_in_total: ProjectivePoint,
    /// sum of live output commitments
    pub c_out_total: ProjectivePoint,
    /// sum of consumed input blindings, mod q
    pub r_in_total: Scalar,
    /// sum of live output blindings, mod q
    pub r_out_total: Scalar,
}

impl Default for ProofState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProofState {
    /// empty state: both totals at the identity, blinding sums at zero
    pub fn new() -> Self {
        Self {
            c_in_total: ProjectivePoint::identity(),
            c_out_total: ProjectivePoint::identity(),
            r_in_total: Scalar::ZERO,
            r_out_total: Scalar::ZERO,
        }
    }

    /// initialize from freshly minted tokens: the mint is the wallet's first
    /// output set, with nothing consumed yet
    pub fn init_from_mint(tokens: &[Token]) -> Self {
        let mut state = Self::new();
        for token in tokens {
            state.c_out_total += token.commitment;
            state.r_out_total += token.r;
        }
        state
    }

    /// fold one spend into the aggregates: inputs move from the output side
    /// to the input side, outputs join the output side
    pub fn update_from_spend(&mut self, inputs: &[Token], outputs: &[Token]) {
        for token in inputs {
            self.c_in_total += token.commitment;
            self.r_in_total += token.r;

            // EC subtraction via point negation
            self.c_out_total += -token.commitment;
            self.r_out_total -= token.r;
        }

        for token in outputs {
            self.c_out_total += token.commitment;
            self.r_out_total += token.r;
        }
    }
}

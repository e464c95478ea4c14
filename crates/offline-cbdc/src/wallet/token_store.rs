//! local wallet token storage
//!
//! tracks tokens and their lifecycle state, keyed by the canonical serial
//! encoding. SPENT is terminal; marking a SPENT token expired is a no-op.

use std::collections::HashMap;

use k256::Scalar;

use crate::curve::scalar_to_bytes;
use crate::token::{Token, TokenState};
use crate::{Error, Result};

/// serial-keyed token store with lifecycle tracking
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: HashMap<[u8; 32], (Token, TokenState)>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// add a newly received token as UNSPENT
    pub fn add_token(&mut self, token: Token) -> Result<()> {
        let key = token.serial_bytes();
        if self.tokens.contains_key(&key) {
            return Err(Error::AlreadyExists("token serial already in store"));
        }
        self.tokens.insert(key, (token, TokenState::Unspent));
        Ok(())
    }

    /// look up a token by serial
    pub fn get(&self, serial: &Scalar) -> Result<&Token> {
        self.tokens
            .get(&scalar_to_bytes(serial))
            .map(|(token, _)| token)
            .ok_or(Error::NotFound)
    }

    /// lifecycle state of a token
    pub fn get_token_state(&self, serial: &Scalar) -> Result<TokenState> {
        self.tokens
            .get(&scalar_to_bytes(serial))
            .map(|(_, state)| *state)
            .ok_or(Error::NotFound)
    }

    /// whether a serial is present
    pub fn contains(&self, serial: &Scalar) -> bool {
        self.tokens.contains_key(&scalar_to_bytes(serial))
    }

    /// mark a token SPENT; only UNSPENT tokens are eligible, and SPENT is
    /// terminal
    pub fn mark_spent(&mut self, serial: &Scalar) -> Result<()> {
        let entry = self
            .tokens
            .get_mut(&scalar_to_bytes(serial))
            .ok_or(Error::NotFound)?;
        if entry.1 != TokenState::Unspent {
            return Err(Error::NotSpendable);
        }
        entry.1 = TokenState::Spent;
        Ok(())
    }

    /// mark a token EXPIRED; spent tokens stay spent
    pub fn mark_expired(&mut self, serial: &Scalar) -> Result<()> {
        let entry = self
            .tokens
            .get_mut(&scalar_to_bytes(serial))
            .ok_or(Error::NotFound)?;
        if entry.1 == TokenState::Spent {
            return Ok(());
        }
        entry.1 = TokenState::Expired;
        Ok(())
    }

    /// all tokens that are UNSPENT and not expired at the given time
    pub fn get_unspent_tokens(&self, now: u64) -> Vec<Token> {
        self.tokens
            .values()
            .filter(|(token, state)| *state == TokenState::Unspent && !token.is_expired(now))
            .map(|(token, _)| token.clone())
            .collect()
    }

    /// iterate all tokens with their states
    pub fn all_tokens(&self) -> impl Iterator<Item = (&Token, TokenState)> {
        self.tokens.values().map(|(token, state)| (token, *state))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

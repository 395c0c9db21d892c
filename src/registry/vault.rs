use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::model::token::{TokenDigest, TokenRecord, TokenSpec};

/// Registered voter tokens, keyed by digest. Plaintext tokens never enter the vault.
/// Each voter holds at most one token.
#[derive(Debug, Default)]
pub struct TokenVault {
    records: HashMap<TokenDigest, TokenRecord>,
    voters: HashSet<String>,
}

impl TokenVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Digest `raw_token` and register it for `voter_id`.
    pub fn register_token(&mut self, raw_token: &str, voter_id: &str) -> Result<()> {
        self.register(TokenSpec::new(raw_token, voter_id).into_record()?)
    }

    /// Insert an already-digested record.
    pub fn register(&mut self, record: TokenRecord) -> Result<()> {
        if self.records.contains_key(&record.token_hash) {
            return Err(Error::DuplicateToken);
        }
        if self.voters.contains(&record.voter_id) {
            return Err(Error::VoterAlreadyRegistered(record.voter_id));
        }
        self.voters.insert(record.voter_id.clone());
        self.records.insert(record.token_hash, record);
        Ok(())
    }

    /// Mark the token as used, returning the voter it was issued to.
    pub fn consume_token(&mut self, raw_token: &str) -> Result<String> {
        self.consume(&TokenDigest::of(raw_token))
    }

    pub fn consume(&mut self, digest: &TokenDigest) -> Result<String> {
        let record = self.records.get_mut(digest).ok_or(Error::UnknownToken)?;
        if record.used {
            return Err(Error::TokenAlreadyUsed);
        }
        record.used = true;
        Ok(record.voter_id.clone())
    }

    /// Undo a consumption whose vote could not be recorded.
    pub fn restore(&mut self, digest: &TokenDigest) -> Result<()> {
        let record = self.records.get_mut(digest).ok_or(Error::UnknownToken)?;
        record.used = false;
        Ok(())
    }

    pub fn get(&self, raw_token: &str) -> Option<&TokenRecord> {
        self.records.get(&TokenDigest::of(raw_token))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

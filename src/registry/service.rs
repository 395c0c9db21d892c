use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{error, info, warn};
use rocket::tokio::{
    sync::{Mutex, RwLock},
    time::timeout,
};

use crate::error::{Error, Result};
use crate::model::{
    candidate::{Candidate, CandidateDesc, CandidateId, CandidateSpec, CandidateTally},
    session::AdminSession,
    token::{TokenDigest, TokenSpec},
    vote::{VoteRecord, VoterActivity},
};

use super::{ballot_box::BallotBox, candidates::CandidateStore, vault::TokenVault};

/// The shared voting ledger.
///
/// Locks are always taken in the order vault, candidates, ballots. Every
/// acquisition is bounded by the configured timeout and reports
/// [`Error::Unavailable`] when it is exceeded.
#[derive(Clone)]
pub struct RegistryService {
    vault: Arc<Mutex<TokenVault>>,
    candidates: Arc<RwLock<CandidateStore>>,
    ballots: Arc<RwLock<BallotBox>>,
    lock_timeout: Duration,
}

impl RegistryService {
    /// Create an empty registry.
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            vault: Default::default(),
            candidates: Default::default(),
            ballots: Default::default(),
            lock_timeout,
        }
    }

    /// Wait for a lock, giving up after the configured timeout.
    async fn acquire<F>(&self, what: &str, lock: F) -> Result<F::Output>
    where
        F: Future,
    {
        timeout(self.lock_timeout, lock).await.map_err(|_| {
            warn!("Timed out after {:?} waiting for the {what}", self.lock_timeout);
            Error::Unavailable(format!("timed out waiting for the {what}"))
        })
    }

    /// Gate admin operations on an unexpired session.
    pub fn as_admin<'a>(&'a self, session: &'a AdminSession) -> Result<AdminRegistry<'a>> {
        session.check(Utc::now())?;
        Ok(AdminRegistry {
            registry: self,
            session,
        })
    }

    /// Cast a vote with a raw token.
    ///
    /// Consuming the token and recording the vote happen under the vault lock,
    /// so concurrent votes with the same token cannot both succeed. If the vote
    /// cannot be recorded, the token is restored before the lock is released.
    pub async fn vote(&self, raw_token: &str, candidate_id: CandidateId) -> Result<()> {
        if raw_token.trim().is_empty() {
            return Err(Error::InvalidInput("token must be non-empty".to_string()));
        }
        let digest = TokenDigest::of(raw_token);

        let mut vault = self.acquire("token vault", self.vault.lock()).await?;
        let candidates = self
            .acquire("candidate store", self.candidates.read())
            .await?;
        let mut ballots = self.acquire("ballot box", self.ballots.write()).await?;

        let voter_id = vault.consume(&digest)?;
        if let Err(e) = ballots.cast_vote(&candidates, voter_id.clone(), candidate_id) {
            if let Err(restore_err) = vault.restore(&digest) {
                error!("Failed to restore token for {voter_id} after rejected vote: {restore_err}");
            }
            warn!("Rejected vote by {voter_id} for candidate {candidate_id}, token restored: {e}");
            return Err(e);
        }

        info!("Accepted vote by {voter_id} for candidate {candidate_id}");
        Ok(())
    }

    /// Active candidates, without vote counts.
    pub async fn list_candidates(&self) -> Result<Vec<CandidateDesc>> {
        let candidates = self
            .acquire("candidate store", self.candidates.read())
            .await?;
        Ok(candidates
            .list_active()
            .cloned()
            .map(CandidateDesc::from)
            .collect())
    }

    /// Active candidates with live vote counts, in ascending ID order.
    pub async fn get_results(&self) -> Result<Vec<CandidateTally>> {
        let candidates = self
            .acquire("candidate store", self.candidates.read())
            .await?;
        let ballots = self.acquire("ballot box", self.ballots.read()).await?;
        let tally = ballots.tally(&candidates);
        Ok(candidates
            .list_active()
            .map(|candidate| CandidateTally {
                candidate: candidate.clone(),
                vote_count: tally.get(&candidate.id).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Who voted for whom, restricted to active candidates.
    pub async fn get_voter_activity(&self) -> Result<Vec<VoterActivity>> {
        let candidates = self
            .acquire("candidate store", self.candidates.read())
            .await?;
        let ballots = self.acquire("ballot box", self.ballots.read()).await?;
        Ok(ballots.all_votes(&candidates))
    }
}

/// Admin-only operations, borrowed from a [`RegistryService`] for an admin session.
/// The session expiry is re-checked on every call.
pub struct AdminRegistry<'a> {
    registry: &'a RegistryService,
    session: &'a AdminSession,
}

impl<'a> AdminRegistry<'a> {
    fn authorize(&self) -> Result<()> {
        self.session.check(Utc::now())
    }

    pub async fn add_candidate(&self, spec: CandidateSpec) -> Result<Candidate> {
        self.authorize()?;
        let registry = self.registry;
        let mut candidates = registry
            .acquire("candidate store", registry.candidates.write())
            .await?;
        let id = candidates.add_candidate(spec)?;
        let candidate = candidates
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Candidate {id}")))?;
        info!(
            "{} added candidate {id}: {} ({})",
            self.session.username, candidate.name, candidate.position
        );
        Ok(candidate)
    }

    pub async fn remove_candidate(&self, id: CandidateId) -> Result<()> {
        self.authorize()?;
        let registry = self.registry;
        let mut candidates = registry
            .acquire("candidate store", registry.candidates.write())
            .await?;
        candidates.remove_candidate(id)?;
        info!("{} removed candidate {id}", self.session.username);
        Ok(())
    }

    pub async fn register_token(&self, spec: TokenSpec) -> Result<()> {
        self.authorize()?;
        let record = spec.into_record()?;
        let registry = self.registry;
        let mut vault = registry.acquire("token vault", registry.vault.lock()).await?;
        let voter_id = record.voter_id.clone();
        vault.register(record)?;
        info!("{} registered a token for {voter_id}", self.session.username);
        Ok(())
    }

    pub async fn results(&self) -> Result<Vec<CandidateTally>> {
        self.authorize()?;
        self.registry.get_results().await
    }

    pub async fn voter_activity(&self) -> Result<Vec<VoterActivity>> {
        self.authorize()?;
        self.registry.get_voter_activity().await
    }

    /// The raw vote ledger, including votes for removed candidates.
    pub async fn ledger(&self) -> Result<Vec<VoteRecord>> {
        self.authorize()?;
        let registry = self.registry;
        let ballots = registry.acquire("ballot box", registry.ballots.read()).await?;
        Ok(ballots.ledger().to_vec())
    }
}

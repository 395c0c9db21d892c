use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{
    candidate::CandidateId,
    vote::{VoteRecord, VoterActivity},
};

use super::candidates::CandidateStore;

/// The append-only vote ledger. Counts are always derived from the ledger
/// rather than kept alongside it.
#[derive(Debug, Default)]
pub struct BallotBox {
    votes: Vec<VoteRecord>,
}

impl BallotBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vote, provided the candidate exists and is active.
    pub fn cast_vote(
        &mut self,
        candidates: &CandidateStore,
        voter_id: String,
        candidate_id: CandidateId,
    ) -> Result<()> {
        if !candidates.is_active(candidate_id) {
            return Err(Error::CandidateNotActive(candidate_id));
        }
        self.votes.push(VoteRecord::new(voter_id, candidate_id));
        Ok(())
    }

    /// Votes per currently active candidate. Active candidates without votes map to zero.
    pub fn tally(&self, candidates: &CandidateStore) -> BTreeMap<CandidateId, u64> {
        let mut tally = candidates
            .list_active()
            .map(|c| (c.id, 0))
            .collect::<BTreeMap<_, _>>();
        for vote in &self.votes {
            if let Some(count) = tally.get_mut(&vote.candidate_id) {
                *count += 1;
            }
        }
        tally
    }

    /// Voter activity in the order votes were cast. Votes for candidates that
    /// have since been removed are hidden here but stay in the ledger.
    pub fn all_votes(&self, candidates: &CandidateStore) -> Vec<VoterActivity> {
        self.votes
            .iter()
            .filter_map(|vote| {
                candidates
                    .get(vote.candidate_id)
                    .filter(|c| c.active)
                    .map(|c| VoterActivity {
                        voter_id: vote.voter_id.clone(),
                        candidate_name: c.name.clone(),
                    })
            })
            .collect()
    }

    /// Every vote ever recorded, including those for removed candidates.
    pub fn ledger(&self) -> &[VoteRecord] {
        &self.votes
    }
}

#[cfg(test)]
mod tests {
    use crate::model::candidate::CandidateSpec;

    use super::*;

    fn two_candidates() -> CandidateStore {
        let mut store = CandidateStore::new();
        store.add_candidate(CandidateSpec::example()).unwrap();
        store.add_candidate(CandidateSpec::example2()).unwrap();
        store
    }

    #[test]
    fn cast_and_tally() {
        let candidates = two_candidates();
        let mut ballots = BallotBox::new();
        ballots
            .cast_vote(&candidates, "V1".into(), CandidateId(1))
            .unwrap();
        ballots
            .cast_vote(&candidates, "V2".into(), CandidateId(1))
            .unwrap();
        ballots
            .cast_vote(&candidates, "V3".into(), CandidateId(2))
            .unwrap();

        let tally = ballots.tally(&candidates);
        assert_eq!(tally.get(&CandidateId(1)), Some(&2));
        assert_eq!(tally.get(&CandidateId(2)), Some(&1));
    }

    #[test]
    fn unknown_or_inactive_candidate() {
        let mut candidates = two_candidates();
        let mut ballots = BallotBox::new();
        assert!(matches!(
            ballots.cast_vote(&candidates, "V1".into(), CandidateId(9)),
            Err(Error::CandidateNotActive(CandidateId(9)))
        ));

        candidates.remove_candidate(CandidateId(2)).unwrap();
        assert!(matches!(
            ballots.cast_vote(&candidates, "V1".into(), CandidateId(2)),
            Err(Error::CandidateNotActive(CandidateId(2)))
        ));
        assert!(ballots.ledger().is_empty());
    }

    #[test]
    fn removal_hides_but_keeps_votes() {
        let mut candidates = two_candidates();
        let mut ballots = BallotBox::new();
        ballots
            .cast_vote(&candidates, "V1".into(), CandidateId(1))
            .unwrap();
        ballots
            .cast_vote(&candidates, "V2".into(), CandidateId(2))
            .unwrap();

        candidates.remove_candidate(CandidateId(1)).unwrap();

        let tally = ballots.tally(&candidates);
        assert_eq!(tally.get(&CandidateId(1)), None);
        assert_eq!(tally.get(&CandidateId(2)), Some(&1));

        assert_eq!(
            ballots.all_votes(&candidates),
            vec![VoterActivity {
                voter_id: "V2".into(),
                candidate_name: "Bob".into(),
            }]
        );

        let ledger = ballots.ledger();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[0].voter_id, "V1");
        assert_eq!(ledger[0].candidate_id, CandidateId(1));
    }

    #[test]
    fn tally_includes_zero_counts() {
        let candidates = two_candidates();
        let ballots = BallotBox::new();
        let tally = ballots.tally(&candidates);
        assert_eq!(tally.len(), 2);
        assert!(tally.values().all(|count| *count == 0));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::candidate::CandidateId;

/// An accepted vote. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub voter_id: String,
    pub candidate_id: CandidateId,
    pub timestamp: DateTime<Utc>,
}

impl VoteRecord {
    /// Record a vote cast now.
    pub fn new(voter_id: String, candidate_id: CandidateId) -> Self {
        Self {
            voter_id,
            candidate_id,
            timestamp: Utc::now(),
        }
    }
}

/// One row of the voter activity view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterActivity {
    pub voter_id: String,
    pub candidate_name: String,
}

/// A vote submission from the voting page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub token: String,
    pub candidate_id: CandidateId,
}

/// Response to an accepted vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteAccepted {
    pub message: String,
}

impl Default for VoteAccepted {
    fn default() -> Self {
        Self {
            message: "Vote submitted successfully".to_string(),
        }
    }
}

use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use rocket::{
    http::{
        impl_from_uri_param_identity,
        uri::fmt::{Path, UriDisplay},
    },
    request::FromParam,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Candidate IDs are sequential integers starting at 1, never reused.
#[derive(
    Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CandidateId(pub u32);

impl Display for CandidateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CandidateId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<u32>().map(Self)
    }
}

impl<'a> FromParam<'a> for CandidateId {
    type Error = std::num::ParseIntError;

    fn from_param(param: &'a str) -> std::result::Result<Self, Self::Error> {
        param.parse()
    }
}

impl UriDisplay<Path> for CandidateId {
    fn fmt(&self, formatter: &mut rocket::http::uri::fmt::Formatter<'_, Path>) -> std::fmt::Result {
        formatter.write_value(self.0.to_string())
    }
}

impl_from_uri_param_identity!([Path] CandidateId);

/// A candidate as held in the store. The vote count is not stored here:
/// it is derived from the ballot box at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub position: String,
    /// False once the candidate has been removed. Removed candidates are kept
    /// so that historical votes stay attributable.
    pub active: bool,
}

/// A candidate together with its live vote count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTally {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub vote_count: u64,
}

impl Deref for CandidateTally {
    type Target = Candidate;

    fn deref(&self) -> &Self::Target {
        &self.candidate
    }
}

/// Public view of a candidate, as shown on the voting page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDesc {
    pub id: CandidateId,
    pub name: String,
    pub position: String,
}

impl From<Candidate> for CandidateDesc {
    fn from(candidate: Candidate) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name,
            position: candidate.position,
        }
    }
}

/// A candidate specification, as submitted by an admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSpec {
    pub name: String,
    pub position: String,
}

impl CandidateSpec {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
        }
    }

    /// Trim both fields, rejecting either if it ends up empty.
    pub fn validated(self) -> Result<Self> {
        let name = self.name.trim();
        let position = self.position.trim();
        if name.is_empty() || position.is_empty() {
            return Err(Error::InvalidInput(
                "candidate name and position must both be non-empty".to_string(),
            ));
        }
        Ok(Self::new(name, position))
    }
}

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::candidate::{Candidate, CandidateId, CandidateSpec};

/// All candidates ever added, active or not, in ID order.
#[derive(Debug)]
pub struct CandidateStore {
    candidates: BTreeMap<CandidateId, Candidate>,
    next_id: u32,
}

impl CandidateStore {
    pub fn new() -> Self {
        Self {
            candidates: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Add an active candidate under the next sequential ID.
    pub fn add_candidate(&mut self, spec: CandidateSpec) -> Result<CandidateId> {
        let spec = spec.validated()?;
        let id = CandidateId(self.next_id);
        self.next_id += 1;
        self.candidates.insert(
            id,
            Candidate {
                id,
                name: spec.name,
                position: spec.position,
                active: true,
            },
        );
        Ok(id)
    }

    /// Deactivate a candidate. Removing an inactive candidate is a no-op.
    pub fn remove_candidate(&mut self, id: CandidateId) -> Result<()> {
        let candidate = self
            .candidates
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("Candidate {id}")))?;
        candidate.active = false;
        Ok(())
    }

    pub fn get(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.get(&id)
    }

    pub fn is_active(&self, id: CandidateId) -> bool {
        self.get(id).map_or(false, |c| c.active)
    }

    /// Active candidates in ascending ID order.
    pub fn list_active(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.values().filter(|c| c.active)
    }

    /// Number of candidates ever added, including removed ones.
    pub fn count(&self) -> u32 {
        self.next_id - 1
    }
}

impl Default for CandidateStore {
    fn default() -> Self {
        Self::new()
    }
}

//! The voting ledger: token vault, candidate store and ballot box, composed
//! behind [`RegistryService`].

mod ballot_box;
mod candidates;
mod service;
mod vault;

pub use ballot_box::BallotBox;
pub use candidates::CandidateStore;
pub use service::{AdminRegistry, RegistryService};
pub use vault::TokenVault;

//! Domain and API types.
//!
//! Everything here serialises to the JSON shapes used by the voting page and
//! admin console: camelCase field names, token digests as lowercase hex, and
//! timestamps as RFC 3339 strings.

pub mod admin;
pub mod candidate;
pub mod session;
pub mod token;
pub mod vote;

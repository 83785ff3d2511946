//! peermatch - Peer-matching service for study group recommendations
//!
//! This library provides the interest-based matching core used by the
//! academic assistant application: a 0/1 student-by-interest matrix is
//! reduced to a low-dimensional embedding (truncated SVD) and peers are
//! ranked by cosine similarity to a target student.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    cosine_similarity, reduce, InterestMatrix, MatchError, PeerMatcher, PeerMatches,
};
pub use crate::models::{InterestAssignment, MatchedPeer, PeerScore, INTEREST_VOCABULARY};

// Core algorithm exports
pub mod matcher;
pub mod matrix;
pub mod similarity;
pub mod svd;

pub use matcher::{MatchError, PeerMatcher, PeerMatches, DEFAULT_MAX_DIMENSIONS, DEFAULT_TOP_N};
pub use matrix::InterestMatrix;
pub use similarity::cosine_similarity;
pub use svd::{reduce, Embedding};

// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    is_known_interest, InterestAssignment, MatchedPeer, PeerScore, Student, INTEREST_VOCABULARY,
};
pub use requests::{FindPeersRequest, RegisterStudentRequest, SaveInterestsRequest};
pub use responses::{
    ErrorResponse, FindPeersResponse, HealthResponse, RegisterStudentResponse,
    SaveInterestsResponse,
};

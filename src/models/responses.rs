use crate::models::domain::MatchedPeer;
use serde::{Deserialize, Serialize};

/// Response for the find peers endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindPeersResponse {
    pub matches: Vec<MatchedPeer>,
    #[serde(rename = "totalStudents")]
    pub total_students: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Response after saving interests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveInterestsResponse {
    pub success: bool,
    pub saved: usize,
}

/// Response after registering a student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterStudentResponse {
    #[serde(rename = "studentId")]
    pub student_id: i64,
}

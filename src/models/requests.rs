use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to find matching peers for a student
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindPeersRequest {
    #[serde(alias = "student_id", rename = "studentId")]
    pub student_id: i64,
    #[serde(default = "default_top_n")]
    #[serde(alias = "top_n", rename = "topN")]
    pub top_n: u16,
}

fn default_top_n() -> u16 {
    5
}

/// Request to replace a student's saved interests
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveInterestsRequest {
    #[serde(alias = "student_id", rename = "studentId")]
    pub student_id: i64,
    #[validate(length(min = 1))]
    pub interests: Vec<String>,
}

/// Request to register a new student with initial interests
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterStudentRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub interests: Vec<String>,
}

use serde::{Deserialize, Serialize};

/// The closed vocabulary of academic topic tags a student may select.
///
/// Seeded into the interests table on startup; assignments naming anything
/// outside this list are rejected before they reach the store.
pub const INTEREST_VOCABULARY: &[&str] = &[
    "math",
    "physics",
    "chemistry",
    "cs",
    "biology",
    "english",
    "artificial intelligence",
    "machine learning",
    "data science",
    "algorithms",
    "data structures",
    "computer networks",
    "operating systems",
    "database systems",
    "software engineering",
    "web development",
    "mobile development",
    "cybersecurity",
    "cloud computing",
    "blockchain",
    "computer graphics",
    "human-computer interaction",
    "internet of things",
    "big data",
    "natural language processing",
    "computer vision",
];

/// True when the interest is part of the fixed vocabulary.
pub fn is_known_interest(interest: &str) -> bool {
    INTEREST_VOCABULARY.contains(&interest)
}

/// One row of the student-interest relation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestAssignment {
    #[serde(rename = "studentId")]
    pub student_id: i64,
    pub interest: String,
}

/// A registered student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A ranked peer produced by the matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerScore {
    #[serde(rename = "studentId")]
    pub student_id: i64,
    pub score: f64,
}

/// A ranked peer enriched with display data for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedPeer {
    #[serde(rename = "studentId")]
    pub student_id: i64,
    pub name: String,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_is_unique() {
        let mut seen = std::collections::HashSet::new();
        for interest in INTEREST_VOCABULARY {
            assert!(seen.insert(interest), "duplicate vocabulary entry: {interest}");
        }
    }

    #[test]
    fn test_known_interest_lookup() {
        assert!(is_known_interest("math"));
        assert!(is_known_interest("natural language processing"));
        assert!(!is_known_interest("underwater basket weaving"));
        assert!(!is_known_interest("Math")); // vocabulary is case-sensitive
    }
}

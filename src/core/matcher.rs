use thiserror::Error;

use crate::core::matrix::InterestMatrix;
use crate::core::similarity::cosine_similarity;
use crate::core::svd::{reduce, Embedding};
use crate::models::{InterestAssignment, PeerScore};

/// Default number of embedding dimensions (capped by the number of
/// distinct interests actually in use)
pub const DEFAULT_MAX_DIMENSIONS: usize = 5;

/// Default number of peers returned per query
pub const DEFAULT_TOP_N: usize = 5;

/// Errors produced by a matching run. Both are recoverable: the caller shows
/// a "no matches / not enough data" message instead of failing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("no students with recorded interests, matching is not possible")]
    EmptyPopulation,

    #[error("student {0} has no recorded interests")]
    StudentNotFound(i64),
}

/// Result of a matching run
#[derive(Debug)]
pub struct PeerMatches {
    pub matches: Vec<PeerScore>,
    pub total_students: usize,
}

/// Interest-based peer matcher.
///
/// # Pipeline stages
/// 1. Build the 0/1 student-by-interest matrix from the assignment relation
/// 2. Reduce it to a low-dimensional embedding (truncated SVD)
/// 3. Rank every other student by cosine similarity to the target
///
/// The matcher holds no state between calls; the matrix and embedding are
/// rebuilt fresh from the caller's snapshot on every request, so any change
/// to the assignment relation is picked up by the next call.
#[derive(Debug, Clone, Copy)]
pub struct PeerMatcher {
    max_dimensions: usize,
}

impl PeerMatcher {
    pub fn new(max_dimensions: usize) -> Self {
        Self { max_dimensions }
    }

    pub fn with_default_dimensions() -> Self {
        Self {
            max_dimensions: DEFAULT_MAX_DIMENSIONS,
        }
    }

    /// Find the `top_n` students most similar to the target.
    ///
    /// Runs the complete pipeline over the given assignment snapshot.
    ///
    /// # Arguments
    /// * `assignments` - The full (student_id, interest) relation
    /// * `target_student_id` - The student to match against
    /// * `top_n` - Maximum number of peers to return
    ///
    /// # Errors
    /// `EmptyPopulation` when the relation is empty, `StudentNotFound` when
    /// the target has no row in the matrix.
    pub fn find_peers(
        &self,
        assignments: &[InterestAssignment],
        target_student_id: i64,
        top_n: usize,
    ) -> Result<PeerMatches, MatchError> {
        let matrix = InterestMatrix::from_assignments(assignments);
        if matrix.is_empty() {
            return Err(MatchError::EmptyPopulation);
        }

        let embedding = reduce(&matrix, self.max_dimensions);
        self.rank(&embedding, &matrix, target_student_id, top_n)
    }

    /// Rank all students other than the target by cosine similarity in the
    /// embedded space.
    ///
    /// Ordering is descending by similarity with ascending student id as the
    /// tie-break, so students with identical interest sets come out in a
    /// stable order. Scores are rounded to two decimal places on output;
    /// ordering uses the unrounded values.
    pub fn rank(
        &self,
        embedding: &Embedding,
        matrix: &InterestMatrix,
        target_student_id: i64,
        top_n: usize,
    ) -> Result<PeerMatches, MatchError> {
        if embedding.is_empty() {
            return Err(MatchError::EmptyPopulation);
        }

        let target_row = matrix
            .row_index_of(target_student_id)
            .ok_or(MatchError::StudentNotFound(target_student_id))?;

        let target_vector = embedding.vector(target_row);
        let total_students = matrix.student_count();

        let mut scored: Vec<(i64, f64)> = matrix
            .student_ids()
            .iter()
            .enumerate()
            .filter(|(row, _)| *row != target_row)
            .map(|(row, &student_id)| {
                let score = cosine_similarity(target_vector, embedding.vector(row));
                (student_id, score)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        scored.truncate(top_n);

        let matches = scored
            .into_iter()
            .map(|(student_id, score)| PeerScore {
                student_id,
                score: round_score(score),
            })
            .collect();

        Ok(PeerMatches {
            matches,
            total_students,
        })
    }
}

impl Default for PeerMatcher {
    fn default() -> Self {
        Self::with_default_dimensions()
    }
}

/// Round to two decimal places, normalizing -0.0 to 0.0.
#[inline]
fn round_score(score: f64) -> f64 {
    let rounded = (score * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignments(pairs: &[(i64, &str)]) -> Vec<InterestAssignment> {
        pairs
            .iter()
            .map(|(id, interest)| InterestAssignment {
                student_id: *id,
                interest: interest.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_shared_interests_outrank_disjoint() {
        let matcher = PeerMatcher::with_default_dimensions();
        let data = assignments(&[
            (1, "math"),
            (1, "physics"),
            (2, "math"),
            (2, "physics"),
            (3, "english"),
        ]);

        let result = matcher.find_peers(&data, 1, 5).unwrap();

        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.matches[0].student_id, 2);
        assert_eq!(result.matches[1].student_id, 3);
        assert!(result.matches[0].score > result.matches[1].score);
        assert_eq!(result.total_students, 3);
    }

    #[test]
    fn test_identical_interest_set_scores_one() {
        let matcher = PeerMatcher::with_default_dimensions();
        let data = assignments(&[(1, "math"), (1, "physics"), (2, "math"), (2, "physics")]);

        let result = matcher.find_peers(&data, 1, 5).unwrap();

        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].student_id, 2);
        assert!((result.matches[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_target_never_in_own_results() {
        let matcher = PeerMatcher::with_default_dimensions();
        let data = assignments(&[(1, "math"), (2, "math"), (3, "math"), (4, "math")]);

        let result = matcher.find_peers(&data, 2, 10).unwrap();

        assert!(result.matches.iter().all(|m| m.student_id != 2));
    }

    #[test]
    fn test_respects_top_n() {
        let matcher = PeerMatcher::with_default_dimensions();
        let data = assignments(&[
            (1, "math"),
            (2, "math"),
            (3, "math"),
            (4, "math"),
            (5, "math"),
            (6, "math"),
        ]);

        let result = matcher.find_peers(&data, 1, 3).unwrap();

        assert_eq!(result.matches.len(), 3);
    }

    #[test]
    fn test_fewer_results_than_top_n_when_population_small() {
        let matcher = PeerMatcher::with_default_dimensions();
        let data = assignments(&[(1, "math"), (2, "math")]);

        let result = matcher.find_peers(&data, 1, 5).unwrap();

        assert_eq!(result.matches.len(), 1);
    }

    #[test]
    fn test_ties_ordered_by_ascending_id() {
        let matcher = PeerMatcher::with_default_dimensions();
        // Students 9 and 2 have identical interest sets, both fully shared
        // with the target
        let data = assignments(&[
            (1, "math"),
            (1, "cs"),
            (9, "math"),
            (9, "cs"),
            (2, "math"),
            (2, "cs"),
            (5, "english"),
        ]);

        let result = matcher.find_peers(&data, 1, 5).unwrap();

        assert_eq!(result.matches[0].student_id, 2);
        assert_eq!(result.matches[1].student_id, 9);
        assert_eq!(result.matches[0].score, result.matches[1].score);
    }

    #[test]
    fn test_empty_population_error() {
        let matcher = PeerMatcher::with_default_dimensions();

        let result = matcher.find_peers(&[], 1, 5);

        assert_eq!(result.unwrap_err(), MatchError::EmptyPopulation);
    }

    #[test]
    fn test_unknown_target_error() {
        let matcher = PeerMatcher::with_default_dimensions();
        let data = assignments(&[(1, "math"), (2, "physics")]);

        let result = matcher.find_peers(&data, 42, 5);

        assert_eq!(result.unwrap_err(), MatchError::StudentNotFound(42));
    }

    #[test]
    fn test_scores_within_cosine_range() {
        let matcher = PeerMatcher::with_default_dimensions();
        let data = assignments(&[
            (1, "math"),
            (1, "cs"),
            (2, "physics"),
            (3, "english"),
            (3, "cs"),
            (4, "math"),
            (4, "physics"),
            (4, "english"),
        ]);

        let result = matcher.find_peers(&data, 1, 10).unwrap();

        for m in &result.matches {
            assert!(m.score >= -1.0 && m.score <= 1.0, "score {} out of range", m.score);
        }
    }

    #[test]
    fn test_determinism_across_calls() {
        let matcher = PeerMatcher::with_default_dimensions();
        let data = assignments(&[
            (1, "math"),
            (1, "physics"),
            (2, "cs"),
            (2, "math"),
            (3, "english"),
            (3, "physics"),
            (4, "cs"),
            (5, "math"),
            (5, "english"),
        ]);

        let first = matcher.find_peers(&data, 3, 5).unwrap();
        let second = matcher.find_peers(&data, 3, 5).unwrap();

        assert_eq!(first.matches.len(), second.matches.len());
        for (a, b) in first.matches.iter().zip(second.matches.iter()) {
            assert_eq!(a.student_id, b.student_id);
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn test_round_score_two_decimals() {
        assert_eq!(round_score(0.666_666), 0.67);
        assert_eq!(round_score(0.994), 0.99);
        assert_eq!(round_score(-0.001), 0.0);
        assert!(round_score(-0.0).is_sign_positive());
    }
}

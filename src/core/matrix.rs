use std::collections::BTreeSet;

use crate::models::InterestAssignment;

/// 0/1 student-by-interest matrix built from the assignment relation.
///
/// Rows are the distinct student ids present in the input, sorted ascending.
/// Columns are the distinct interest names present in the input, sorted
/// ascending. Both orders are deterministic for a given input, so a row index
/// always maps back to the same student id within one build.
#[derive(Debug, Clone)]
pub struct InterestMatrix {
    student_ids: Vec<i64>,
    interests: Vec<String>,
    // Row-major, student_ids.len() x interests.len()
    values: Vec<f64>,
}

impl InterestMatrix {
    /// Build the matrix from raw (student_id, interest) pairs.
    ///
    /// Duplicate pairs are collapsed to a single 1.0 cell. Empty input
    /// produces an empty (0x0) matrix.
    pub fn from_assignments(assignments: &[InterestAssignment]) -> Self {
        let mut ids: BTreeSet<i64> = BTreeSet::new();
        let mut names: BTreeSet<&str> = BTreeSet::new();

        for a in assignments {
            ids.insert(a.student_id);
            names.insert(a.interest.as_str());
        }

        let student_ids: Vec<i64> = ids.into_iter().collect();
        let interests: Vec<String> = names.into_iter().map(String::from).collect();

        let cols = interests.len();
        let mut values = vec![0.0; student_ids.len() * cols];

        for a in assignments {
            // Both lookups succeed by construction
            let row = match student_ids.binary_search(&a.student_id) {
                Ok(r) => r,
                Err(_) => continue,
            };
            let col = match interests.binary_search_by(|name| name.as_str().cmp(&a.interest)) {
                Ok(c) => c,
                Err(_) => continue,
            };
            values[row * cols + col] = 1.0;
        }

        Self {
            student_ids,
            interests,
            values,
        }
    }

    /// Number of distinct students (matrix rows).
    pub fn student_count(&self) -> usize {
        self.student_ids.len()
    }

    /// Number of distinct interests (matrix columns).
    pub fn interest_count(&self) -> usize {
        self.interests.len()
    }

    /// True when no student or no interest appears in the relation.
    pub fn is_empty(&self) -> bool {
        self.student_ids.is_empty() || self.interests.is_empty()
    }

    /// Student ids in row order.
    pub fn student_ids(&self) -> &[i64] {
        &self.student_ids
    }

    /// Interest names in column order.
    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    /// Row vector for the given row index.
    pub fn row(&self, index: usize) -> &[f64] {
        let cols = self.interests.len();
        &self.values[index * cols..(index + 1) * cols]
    }

    /// Row index of a student id, if present.
    pub fn row_index_of(&self, student_id: i64) -> Option<usize> {
        self.student_ids.binary_search(&student_id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(student_id: i64, interest: &str) -> InterestAssignment {
        InterestAssignment {
            student_id,
            interest: interest.to_string(),
        }
    }

    #[test]
    fn test_empty_input_gives_empty_matrix() {
        let matrix = InterestMatrix::from_assignments(&[]);

        assert_eq!(matrix.student_count(), 0);
        assert_eq!(matrix.interest_count(), 0);
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_shape_matches_distinct_counts() {
        let assignments = vec![
            assignment(2, "math"),
            assignment(1, "physics"),
            assignment(1, "math"),
            assignment(3, "math"),
        ];

        let matrix = InterestMatrix::from_assignments(&assignments);

        assert_eq!(matrix.student_count(), 3);
        assert_eq!(matrix.interest_count(), 2);
    }

    #[test]
    fn test_rows_and_columns_sorted_ascending() {
        let assignments = vec![
            assignment(30, "physics"),
            assignment(10, "chemistry"),
            assignment(20, "math"),
        ];

        let matrix = InterestMatrix::from_assignments(&assignments);

        assert_eq!(matrix.student_ids(), &[10, 20, 30]);
        assert_eq!(
            matrix.interests(),
            &["chemistry".to_string(), "math".to_string(), "physics".to_string()]
        );
    }

    #[test]
    fn test_duplicate_pairs_deduplicated() {
        let assignments = vec![
            assignment(1, "math"),
            assignment(1, "math"),
            assignment(1, "math"),
        ];

        let matrix = InterestMatrix::from_assignments(&assignments);

        assert_eq!(matrix.student_count(), 1);
        assert_eq!(matrix.interest_count(), 1);
        assert_eq!(matrix.row(0), &[1.0]);
    }

    #[test]
    fn test_cells_reflect_assignments() {
        let assignments = vec![
            assignment(1, "math"),
            assignment(1, "physics"),
            assignment(2, "english"),
        ];

        let matrix = InterestMatrix::from_assignments(&assignments);

        // Columns sorted: english, math, physics
        assert_eq!(matrix.row(0), &[0.0, 1.0, 1.0]); // student 1
        assert_eq!(matrix.row(1), &[1.0, 0.0, 0.0]); // student 2
    }

    #[test]
    fn test_row_index_lookup() {
        let assignments = vec![assignment(5, "math"), assignment(9, "math")];

        let matrix = InterestMatrix::from_assignments(&assignments);

        assert_eq!(matrix.row_index_of(5), Some(0));
        assert_eq!(matrix.row_index_of(9), Some(1));
        assert_eq!(matrix.row_index_of(7), None);
    }
}

use crate::core::matrix::InterestMatrix;

/// Maximum power-iteration steps per component
const MAX_ITERATIONS: usize = 200;

/// Convergence threshold on the eigenvalue estimate
const TOLERANCE: f64 = 1e-12;

/// Eigenvalues below this are treated as zero (rank exhausted)
const RANK_EPSILON: f64 = 1e-10;

/// Reduced representation of an interest matrix: one dense vector per
/// student, aligned with the matrix's row order.
#[derive(Debug, Clone)]
pub struct Embedding {
    vectors: Vec<Vec<f64>>,
    dimensions: usize,
}

impl Embedding {
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embedded vector for the given matrix row.
    pub fn vector(&self, row: usize) -> &[f64] {
        &self.vectors[row]
    }
}

/// Project the matrix rows into `min(max_dimensions, columns)` dimensions
/// via truncated SVD.
///
/// The top right-singular vectors are extracted by power iteration with
/// deflation on the Gram matrix (columns x columns, so at most
/// vocabulary-sized), and each row is projected onto them. Start vectors are
/// fixed rather than random, so repeated calls on the same matrix produce
/// identical output.
///
/// An empty matrix (no rows or no columns) yields an empty embedding;
/// callers short-circuit since no ranking is possible.
pub fn reduce(matrix: &InterestMatrix, max_dimensions: usize) -> Embedding {
    let rows = matrix.student_count();
    let cols = matrix.interest_count();
    let k = max_dimensions.min(cols);

    if rows == 0 || cols == 0 || k == 0 {
        return Embedding {
            vectors: Vec::new(),
            dimensions: 0,
        };
    }

    let mut gram = gram_matrix(matrix);
    let mut components: Vec<Vec<f64>> = Vec::with_capacity(k);

    for index in 0..k {
        match dominant_eigenvector(&gram, cols, index) {
            Some((eigenvalue, vector)) => {
                deflate(&mut gram, cols, eigenvalue, &vector);
                components.push(vector);
            }
            None => {
                // Matrix rank exhausted; remaining coordinates are zero
                components.push(vec![0.0; cols]);
            }
        }
    }

    let vectors = (0..rows)
        .map(|r| {
            let row = matrix.row(r);
            components
                .iter()
                .map(|component| dot(row, component))
                .collect()
        })
        .collect();

    Embedding {
        vectors,
        dimensions: k,
    }
}

/// Gram matrix A^T * A, symmetric positive semi-definite.
fn gram_matrix(matrix: &InterestMatrix) -> Vec<f64> {
    let rows = matrix.student_count();
    let cols = matrix.interest_count();
    let mut gram = vec![0.0; cols * cols];

    for r in 0..rows {
        let row = matrix.row(r);
        for i in 0..cols {
            if row[i] == 0.0 {
                continue;
            }
            for j in 0..cols {
                gram[i * cols + j] += row[i] * row[j];
            }
        }
    }

    gram
}

/// Extract the dominant eigenpair of a symmetric matrix by power iteration.
///
/// Returns None when the matrix is numerically zero (all remaining
/// eigenvalues vanished after deflation).
fn dominant_eigenvector(gram: &[f64], cols: usize, component: usize) -> Option<(f64, Vec<f64>)> {
    let mut vector = start_vector(cols, component);
    let mut eigenvalue = 0.0;

    for _ in 0..MAX_ITERATIONS {
        let mut next = mat_vec(gram, cols, &vector);
        let norm = l2_norm(&next);
        if norm < RANK_EPSILON {
            return None;
        }
        for value in &mut next {
            *value /= norm;
        }

        let next_eigenvalue = rayleigh_quotient(gram, cols, &next);
        let converged = (next_eigenvalue - eigenvalue).abs() < TOLERANCE;
        vector = next;
        eigenvalue = next_eigenvalue;
        if converged {
            break;
        }
    }

    if eigenvalue < RANK_EPSILON {
        return None;
    }

    Some((eigenvalue, vector))
}

/// Deterministic start vector: strictly positive entries with a
/// component-dependent perturbation so consecutive extractions do not start
/// orthogonal to their target direction.
fn start_vector(cols: usize, component: usize) -> Vec<f64> {
    let mut vector: Vec<f64> = (0..cols)
        .map(|i| 1.0 + 0.5 * (((i + component + 1) as f64) * 0.754_877).sin())
        .collect();

    let norm = l2_norm(&vector);
    for value in &mut vector {
        *value /= norm;
    }
    vector
}

fn mat_vec(gram: &[f64], cols: usize, vector: &[f64]) -> Vec<f64> {
    (0..cols)
        .map(|i| dot(&gram[i * cols..(i + 1) * cols], vector))
        .collect()
}

fn rayleigh_quotient(gram: &[f64], cols: usize, unit: &[f64]) -> f64 {
    dot(&mat_vec(gram, cols, unit), unit)
}

/// Remove an extracted eigenpair: B -= lambda * v * v^T
fn deflate(gram: &mut [f64], cols: usize, eigenvalue: f64, vector: &[f64]) {
    for i in 0..cols {
        for j in 0..cols {
            gram[i * cols + j] -= eigenvalue * vector[i] * vector[j];
        }
    }
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

pub(crate) fn l2_norm(vector: &[f64]) -> f64 {
    dot(vector, vector).sqrt()
}

use crate::core::svd::{dot, l2_norm};

/// Cosine similarity between two vectors.
///
/// Defined as 0.0 when either vector has zero magnitude, so a student whose
/// embedded row vanished (no recorded interests, or rank-deficient input)
/// compares as dissimilar rather than producing NaN.
#[inline]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot(a, b) / (norm_a * norm_b)
}

//! Similarity engine — cosine similarity between embedding vectors.

use tagster_core::error::{Result, TagsterError};

/// Cosine similarity between two vectors, in [-1, 1].
///
/// Pure function. The vectors must have equal length and non-zero
/// magnitude; anything else indicates a corrupted embedding and fails the
/// request.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(TagsterError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(d, aa, bb), (x, y)| {
            (d + x * y, aa + x * x, bb + y * y)
        });

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(TagsterError::DegenerateVector);
    }

    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_similarity_is_one() {
        let a = vec![0.3, -1.2, 4.5, 0.01];
        assert!((cosine_similarity(&a, &a).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_commutativity() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![-0.5, 0.25, 4.0];
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        let x = vec![1.0, 0.0];
        let y = vec![0.0, 1.0];
        let neg_x = vec![-1.0, 0.0];
        assert!(cosine_similarity(&x, &y).unwrap().abs() < 1e-6);
        assert!((cosine_similarity(&x, &neg_x).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 2.0, 3.0, 4.0];
        match cosine_similarity(&a, &b).unwrap_err() {
            TagsterError::DimensionMismatch { left, right } => {
                assert_eq!((left, right), (3, 4));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_magnitude_is_degenerate() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert!(matches!(
            cosine_similarity(&a, &b).unwrap_err(),
            TagsterError::DegenerateVector
        ));
        assert!(matches!(
            cosine_similarity(&b, &a).unwrap_err(),
            TagsterError::DegenerateVector
        ));
    }
}

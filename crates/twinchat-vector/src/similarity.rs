/// Cosine similarity in `[-1, 1]`.
///
/// A zero denominator (either vector all zeros) is replaced by 1, so
/// degenerate vectors score 0 rather than NaN. Vectors of different length
/// are compared over their common prefix.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut a_mag = 0.0f32;
    let mut b_mag = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        a_mag += x * x;
        b_mag += y * y;
    }
    let denom = a_mag.sqrt() * b_mag.sqrt();
    let denom = if denom == 0.0 { 1.0 } else { denom };
    dot / denom
}

/// Scale `v` to unit length in place. Zero vectors are left untouched.
/// Returns the original norm.
pub fn l2_normalize(v: &mut [f32]) -> f32 {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() { *x /= norm; }
    }
    norm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_and_opposite_vectors() {
        let v = [0.3f32, -1.2, 4.0, 0.0, 2.5];
        let neg: Vec<f32> = v.iter().map(|x| -x).collect();
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&v, &neg) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn short_vectors_still_score_one_against_themselves() {
        let v = [0.01f32, 0.02];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn normalize_yields_unit_norm() {
        let mut v = vec![3.0f32, 4.0];
        assert!((l2_normalize(&mut v) - 5.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6 && (v[1] - 0.8).abs() < 1e-6);
        let mut z = vec![0.0f32; 3];
        assert_eq!(l2_normalize(&mut z), 0.0);
        assert_eq!(z, vec![0.0; 3]);
    }
}

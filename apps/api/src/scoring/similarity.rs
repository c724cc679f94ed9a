//! Semantic similarity between a resume and a job description.

use tracing::debug;

use crate::embedding::{EncodingRole, TextEncoder};
use crate::errors::AppError;
use crate::scoring::preprocess::preprocess;

/// Cosine similarity of two equal-length vectors, in [-1, 1].
///
/// Fails on a dimension mismatch or a zero-norm vector rather than returning NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, AppError> {
    if a.len() != b.len() {
        return Err(AppError::SimilarityCompute(format!(
            "embedding dimensions differ ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Err(AppError::SimilarityCompute("empty embedding".to_string()));
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(AppError::SimilarityCompute("zero-norm embedding".to_string()));
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0) as f32)
}

/// Encodes both texts and returns their cosine similarity.
///
/// Returns `Ok(None)` when either text is empty after preprocessing; there is
/// nothing to compare.
pub async fn compute_similarity(
    encoder: &dyn TextEncoder,
    resume_text: &str,
    job_description: &str,
) -> Result<Option<f32>, AppError> {
    let resume_clean = preprocess(resume_text);
    let job_clean = preprocess(job_description);

    if resume_clean.is_empty() || job_clean.is_empty() {
        return Ok(None);
    }

    let resume_vec = encoder.encode(EncodingRole::Passage, &resume_clean).await?;
    let job_vec = encoder.encode(EncodingRole::Query, &job_clean).await?;

    let similarity = cosine_similarity(&resume_vec, &job_vec)?;
    debug!("Resume/JD cosine similarity: {similarity:.4}");
    Ok(Some(similarity))
}

/// Rescales a cosine similarity to a 0–100 content score.
pub fn content_score(similarity: f32) -> u8 {
    (similarity as f64 * 100.0)
        .round_ties_even()
        .clamp(0.0, 100.0) as u8
}

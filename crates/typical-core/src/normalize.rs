use itertools::Itertools;

use crate::{Result, TypicalError};

/// Reject vectors the pipeline cannot score.
///
/// `-inf` is accepted as the masked sentinel and maps to probability zero, but at least
/// one entry must be finite.
pub fn validate(scores: &[f32]) -> Result<()> {
    if scores.is_empty() {
        return Err(TypicalError::InvalidInput("empty score vector".into()));
    }
    if let Some((index, x)) = scores
        .iter()
        .find_position(|x| x.is_nan() || **x == f32::INFINITY)
    {
        return Err(TypicalError::InvalidInput(format!(
            "score {x} at index {index}"
        )));
    }
    if !scores.iter().any(|x| x.is_finite()) {
        return Err(TypicalError::InvalidInput("no finite score".into()));
    }
    Ok(())
}

/// Softmax over the scores, shifted by the maximum before exponentiating.
///
/// Exponentials and their sum are taken in `f64`; only the result is rounded to `f32`.
pub fn normalize(scores: &[f32]) -> Result<Vec<f32>> {
    validate(scores)?;

    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let probs = scores
        .iter()
        .map(|&x| (f64::from(x) - f64::from(max)).exp())
        .collect_vec();
    // the maximum contributes exactly 1
    let sum: f64 = probs.iter().sum();
    Ok(probs.into_iter().map(|x| (x / sum) as f32).collect())
}

/// Element-wise natural log of [`normalize`]. Zero probabilities become `-inf`.
pub fn log_normalize(scores: &[f32]) -> Result<Vec<f32>> {
    let probs = normalize(scores)?;
    Ok(probs.into_iter().map(f32::ln).collect())
}

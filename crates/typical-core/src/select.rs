use itertools::Itertools;

use crate::{filter, normalize, typical_mask, MassThreshold, Result, TypicalError};

/// Scale non-negative weights so they sum to 1.
pub fn renormalize(weights: &[f32]) -> Result<Vec<f32>> {
    let sum: f64 = weights.iter().map(|&x| f64::from(x)).sum();
    if sum.is_nan() || sum <= 0.0 {
        return Err(TypicalError::DivideByZero);
    }
    Ok(weights
        .iter()
        .map(|&x| (f64::from(x) / sum) as f32)
        .collect())
}

/// Draw one token from the typical set of the logits.
///
/// Probabilities of atypical tokens are zeroed and the survivors renormalized before the
/// draw, so a masked token is never returned.
pub fn sample_index(
    scores: &[f32],
    mass_threshold: MassThreshold,
    rng: &mut fastrand::Rng,
) -> Result<usize> {
    let mask = typical_mask(scores, mass_threshold)?;
    let probs = normalize(scores)?
        .into_iter()
        .zip(mask)
        .map(|(x, keep)| if keep { x } else { 0.0 })
        .collect_vec();
    let probs = renormalize(&probs)?;

    let rand = f64::from(rng.f32());
    let (token, _) = probs
        .into_iter()
        .enumerate()
        .filter(|&(_, x)| x > 0.0)
        .scan(0.0f64, |cum, (id, x)| {
            *cum += f64::from(x);
            Some((id, *cum))
        })
        .find_or_last(|&(_, cum)| rand < cum)
        .ok_or(TypicalError::DivideByZero)?;
    Ok(token)
}

/// Index of the largest logit left after typical filtering; ties go to the lowest index.
pub fn best_index(scores: &[f32], mass_threshold: MassThreshold) -> Result<usize> {
    let filtered = filter(scores, mass_threshold, f32::NEG_INFINITY)?;
    let (token, _) = filtered
        .into_iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(id, max), (index, x)| match x > max {
            true => (index, x),
            false => (id, max),
        });
    Ok(token)
}

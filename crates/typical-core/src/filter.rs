use itertools::Itertools;

use crate::{log_normalize, shifted_scores, typical_threshold, MassThreshold, Result};

/// `true` for every token that survives typical filtering of the logits.
///
/// At least one entry is `true`: the most typical token never exceeds the cutoff.
pub fn typical_mask(scores: &[f32], mass_threshold: MassThreshold) -> Result<Vec<bool>> {
    let log_probs = log_normalize(scores)?;
    let typicality = shifted_scores(&log_probs);
    let threshold = typical_threshold(scores, &typicality, mass_threshold)?;

    let mask = typicality.iter().map(|&x| x <= threshold).collect_vec();
    log::trace!(
        "typical filter keeps {} of {} tokens",
        mask.iter().filter(|&&keep| keep).count(),
        mask.len()
    );
    Ok(mask)
}

/// Replace the score of every atypical token with `masked_value`.
pub fn filter(
    scores: &[f32],
    mass_threshold: MassThreshold,
    masked_value: f32,
) -> Result<Vec<f32>> {
    let mask = typical_mask(scores, mass_threshold)?;
    Ok(scores
        .iter()
        .zip(mask)
        .map(|(&x, keep)| if keep { x } else { masked_value })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold(value: f32) -> MassThreshold {
        MassThreshold::new(value).unwrap()
    }

    #[test]
    fn masks_all_but_dominant_token() {
        let filtered = filter(&[5.0, 1.0, 1.0, 1.0], threshold(0.9), f32::NEG_INFINITY).unwrap();
        assert_eq!(
            filtered,
            vec![5.0, f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY]
        );
    }

    #[test]
    fn uniform_scores_are_all_typical() {
        let filtered = filter(&[1.0; 4], threshold(0.9), f32::NEG_INFINITY).unwrap();
        assert_eq!(filtered, vec![1.0; 4]);
    }

    #[test]
    fn full_threshold_keeps_everything() {
        let scores = [3.0, -2.0, 0.5, 7.0, -9.0, 1.0];
        let mask = typical_mask(&scores, threshold(1.0)).unwrap();
        assert!(mask.into_iter().all(|keep| keep));
    }

    #[test]
    fn masked_sentinel_stays_masked() {
        let scores = [2.0, f32::NEG_INFINITY, 1.9, 2.1];
        let mask = typical_mask(&scores, threshold(0.9)).unwrap();
        assert!(!mask[1]);
        assert!(mask.iter().any(|&keep| keep));
    }

    #[test]
    fn atypical_high_probability_token_can_be_dropped() {
        // a flat tail makes entropy high, so the single peak is less typical than the tail
        let mut scores = vec![0.0; 64];
        scores[0] = 3.0;
        let mask = typical_mask(&scores, threshold(0.5)).unwrap();
        assert!(!mask[0]);
        assert!(mask[1]);
    }
}

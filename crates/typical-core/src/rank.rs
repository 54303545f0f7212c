use itertools::Itertools;
use voracious_radix_sort::RadixSort;

use crate::{normalize, radix, MassThreshold, Result, TypicalError};

/// A token in typicality order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    /// Position in the original score vector.
    pub index: usize,
    /// Original score of the token.
    pub score: f32,
    pub typicality: f32,
}

/// Pair every score with its index and typicality, then sort ascending by typicality.
///
/// Tokens of equal typicality keep their original relative order.
pub fn sort_by_typicality(scores: &[f32], typicality: &[f32]) -> Result<Vec<Ranked>> {
    if scores.len() != typicality.len() {
        return Err(TypicalError::InvalidInput(format!(
            "{} scores but {} typicality scores",
            scores.len(),
            typicality.len()
        )));
    }

    if scores.len() > u32::MAX as usize {
        return Err(TypicalError::InvalidInput(format!(
            "{} scores exceed the indexable vocabulary",
            scores.len()
        )));
    }

    let mut sorted = scores
        .iter()
        .zip_eq(typicality.iter())
        .enumerate()
        .map(|(id, (&x, &y))| radix::TypicalityWithIndex::new(id, x, y))
        .collect_vec();
    sorted.voracious_sort();

    Ok(sorted
        .into_iter()
        .map(|x| Ranked {
            index: x.index,
            score: x.score,
            typicality: x.typicality,
        })
        .collect())
}

/// Running sum of the softmax of `ordered` scores, in the given order.
pub fn cumulative_mass(ordered: &[f32]) -> Result<Vec<f32>> {
    let probs = normalize(ordered)?;
    Ok(probs
        .into_iter()
        .scan(0.0f64, |cum, x| {
            *cum += f64::from(x);
            Some(*cum as f32)
        })
        .collect())
}

/// Typicality cutoff: tokens scoring at or below it are kept.
///
/// Counts the leading tokens (in typicality order) whose cumulative mass stays below the
/// threshold, and returns the typicality of the token at that position. So the token that
/// first reaches the threshold is kept too, and the most typical token is always kept.
pub fn typical_threshold(
    scores: &[f32],
    typicality: &[f32],
    mass_threshold: MassThreshold,
) -> Result<f32> {
    let sorted = sort_by_typicality(scores, typicality)?;
    let ordered = sorted.iter().map(|x| x.score).collect_vec();
    let cumulative = cumulative_mass(&ordered)?;

    // the running sum may round past 1 before the tail, so a full threshold keeps all
    let keep = match mass_threshold.is_full() {
        true => sorted.len(),
        false => cumulative
            .iter()
            .take_while(|&&cum| cum < mass_threshold.get())
            .count(),
    };
    let index = keep.min(sorted.len() - 1);
    let threshold = sorted[index].typicality;

    log::trace!(
        "typical threshold {threshold} at rank {index} of {}",
        sorted.len()
    );
    Ok(threshold)
}

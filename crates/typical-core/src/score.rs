/// Shannon entropy in nats of a log-distribution.
///
/// Terms with `-inf` log-probability are skipped, i.e. `0 * log 0 = 0`. Summed in `f64`.
pub fn entropy(log_probs: &[f32]) -> f32 {
    log_probs
        .iter()
        .filter(|x| x.is_finite())
        .map(|&x| {
            let x = f64::from(x);
            -x * x.exp()
        })
        .sum::<f64>() as f32
}

/// Typicality of each token: `|-log p - H|`. Lower is more typical.
///
/// Zero-probability tokens score `+inf`.
pub fn shifted_scores(log_probs: &[f32]) -> Vec<f32> {
    let entropy = entropy(log_probs);
    log_probs.iter().map(|&x| (-x - entropy).abs()).collect()
}

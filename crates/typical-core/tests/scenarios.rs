use typical_core::{
    best_index, filter, sample_index, typical_mask, MassThreshold, TypicalError,
};

fn threshold(value: f32) -> MassThreshold {
    MassThreshold::new(value).unwrap()
}

#[test]
fn dominant_token_wins() {
    let scores = [5.0, 1.0, 1.0, 1.0];
    assert_eq!(best_index(&scores, threshold(0.9)).unwrap(), 0);

    let mut rng = fastrand::Rng::with_seed(11);
    assert_eq!(sample_index(&scores, threshold(0.9), &mut rng).unwrap(), 0);
}

#[test]
fn uniform_keeps_all_and_picks_lowest_index() {
    let scores = [1.0, 1.0, 1.0, 1.0];
    let mask = typical_mask(&scores, threshold(0.9)).unwrap();
    assert_eq!(mask, vec![true; 4]);
    assert_eq!(best_index(&scores, threshold(0.9)).unwrap(), 0);
}

#[test]
fn full_mass_retains_vocabulary() {
    let scores = [0.1, 4.0, -3.0, 2.5, 2.5, -0.7, 9.0];
    let filtered = filter(&scores, threshold(1.0), f32::NEG_INFINITY).unwrap();
    assert_eq!(filtered, scores.to_vec());

    let filtered = filter(&scores, threshold(1.0), 0.0).unwrap();
    assert_eq!(filtered, scores.to_vec());
}

#[test]
fn probabilities_masked_with_zero() {
    let scores = [5.0, 1.0, 1.0, 1.0];
    let probs = typical_core::normalize(&scores).unwrap();
    let mask = typical_mask(&scores, threshold(0.9)).unwrap();
    let filtered = probs
        .iter()
        .zip(&mask)
        .map(|(&x, &keep)| if keep { x } else { 0.0 })
        .collect::<Vec<_>>();
    assert_eq!(&filtered[1..], &[0.0, 0.0, 0.0]);
    assert!(filtered[0] > 0.9);
}

#[test]
fn invalid_requests_are_rejected() {
    assert!(matches!(
        MassThreshold::new(0.0),
        Err(TypicalError::InvalidThreshold(_))
    ));
    assert!(matches!(
        best_index(&[], threshold(0.9)),
        Err(TypicalError::InvalidInput(_))
    ));
    assert!(matches!(
        best_index(&[1.0, f32::INFINITY], threshold(0.9)),
        Err(TypicalError::InvalidInput(_))
    ));
}

use std::{fmt, str::FromStr};

use derivative::Derivative;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::Sampler;
use crate::{best_index, sample_index, typical_mask, MassThreshold, Result, TypicalError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeMode {
    /// Draw from the renormalized typical set.
    #[default]
    Sample,
    /// Take the most likely token of the typical set.
    Greedy,
}

impl fmt::Display for DecodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeMode::Sample => write!(f, "sample"),
            DecodeMode::Greedy => write!(f, "greedy"),
        }
    }
}

impl FromStr for DecodeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sample" => Ok(DecodeMode::Sample),
            "greedy" => Ok(DecodeMode::Greedy),
            other => Err(format!("unknown decode mode `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct TypicalParams {
    /// Probability mass of the most typical tokens to keep, in `(0, 1]`.
    #[derivative(Default(value = "MassThreshold::DEFAULT"))]
    #[serde(alias = "tau")]
    pub mass_threshold: f32,
    pub mode: DecodeMode,
    /// Seed of the sampling random source.
    pub seed: Option<u64>,
}

impl TypicalParams {
    pub fn mass_threshold(&self) -> Result<MassThreshold> {
        MassThreshold::new(self.mass_threshold)
    }
}

#[derive(Debug)]
pub struct TypicalSampler {
    pub params: TypicalParams,
    threshold: MassThreshold,
    rng: fastrand::Rng,
}

impl TypicalSampler {
    pub fn new(params: TypicalParams) -> Result<Self> {
        let threshold = params.mass_threshold()?;
        let rng = match params.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Ok(Self {
            params,
            threshold,
            rng,
        })
    }

    #[inline]
    pub fn threshold(&self) -> MassThreshold {
        self.threshold
    }

    /// Pick one token index from raw logits according to the configured mode.
    pub fn decode(&mut self, logits: &[f32]) -> Result<usize> {
        match self.params.mode {
            DecodeMode::Sample => sample_index(logits, self.threshold, &mut self.rng),
            DecodeMode::Greedy => best_index(logits, self.threshold),
        }
    }
}

impl Sampler for TypicalSampler {
    fn transform(&self, logits: &mut [f32]) -> Result<()> {
        let mask = typical_mask(logits, self.threshold)?;
        logits
            .iter_mut()
            .zip(mask)
            .filter(|(_, keep)| !keep)
            .for_each(|(x, _)| *x = f32::NEG_INFINITY);
        Ok(())
    }

    fn sample(&mut self, probs: &[f32]) -> Result<u32> {
        // softmax of log-probabilities gives the probabilities back
        let logits = probs.iter().map(|x| x.ln()).collect_vec();
        let token = self.decode(&logits)?;
        u32::try_from(token)
            .map_err(|_| TypicalError::InvalidInput(format!("token {token} exceeds u32")))
    }
}

//! Typical decoding for autoregressive generation.
//!
//! Given the logits of one generation step, tokens whose surprisal is close to the
//! entropy of the distribution are kept until their probability mass reaches a
//! threshold. The rest are masked, and one index is either sampled from the survivors
//! or picked greedily. See <https://arxiv.org/abs/2202.00666>.

use derivative::Derivative;
use serde::{Deserialize, Serialize};

pub mod filter;
pub mod normalize;
pub mod rank;
pub mod sampler;
pub mod score;
pub mod select;

mod radix;

pub use filter::{filter, typical_mask};
pub use normalize::{log_normalize, normalize};
pub use rank::{cumulative_mass, sort_by_typicality, typical_threshold, Ranked};
pub use score::{entropy, shifted_scores};
pub use select::{best_index, renormalize, sample_index};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypicalError {
    /// The score vector is empty, or holds `NaN`/`+inf`, or has no finite entry.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("mass threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f32),
    /// No probability mass survived filtering.
    #[error("surviving probability mass is zero")]
    DivideByZero,
}

pub type Result<T, E = TypicalError> = std::result::Result<T, E>;

/// Target cumulative probability mass of the kept tokens. Always in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Derivative, Serialize)]
#[derivative(Default)]
#[serde(into = "f32")]
pub struct MassThreshold(#[derivative(Default(value = "MassThreshold::DEFAULT"))] f32);

impl MassThreshold {
    pub const DEFAULT: f32 = 0.9;

    pub fn new(value: f32) -> Result<Self> {
        match value > 0.0 && value <= 1.0 {
            true => Ok(Self(value)),
            false => Err(TypicalError::InvalidThreshold(value)),
        }
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }

    /// Whether the threshold asks for the whole distribution.
    #[inline]
    pub fn is_full(self) -> bool {
        self.0 >= 1.0
    }
}

impl TryFrom<f32> for MassThreshold {
    type Error = TypicalError;

    fn try_from(value: f32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<MassThreshold> for f32 {
    fn from(value: MassThreshold) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for MassThreshold {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f32::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

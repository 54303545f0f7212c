use crate::Result;

pub mod typical;

pub trait Sampler {
    /// Update the raw model output in place before it is normalized.
    fn transform(&self, logits: &mut [f32]) -> Result<()>;
    /// Select one token from the distribution.
    fn sample(&mut self, probs: &[f32]) -> Result<u32>;
}

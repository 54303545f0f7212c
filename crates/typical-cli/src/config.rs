use serde::{Deserialize, Serialize};
use typical_core::sampler::typical::TypicalParams;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub decoder: TypicalParams,
}

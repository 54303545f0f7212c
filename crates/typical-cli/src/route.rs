use anyhow::Result;
use flume::{Receiver, Sender};
use typical_core::sampler::typical::TypicalSampler;

#[derive(Debug)]
pub struct DecodeRequest {
    /// Logits of one generation step.
    pub scores: Vec<f32>,
    pub sender: Sender<typical_core::Result<usize>>,
}

/// Answer decode requests one by one until every sender is dropped.
pub async fn decode_route(
    receiver: Receiver<DecodeRequest>,
    mut sampler: TypicalSampler,
) -> Result<()> {
    log::info!(
        "decoder ready: mode {}, mass threshold {}",
        sampler.params.mode,
        sampler.threshold().get()
    );

    let mut steps = 0usize;
    loop {
        let Ok(DecodeRequest { scores, sender }) = receiver.recv_async().await else {
            log::info!("decoder exit after {steps} steps");
            break Ok(());
        };

        let result = sampler.decode(&scores);
        if let Ok(token) = &result {
            log::debug!("step {steps}: token {token} of {}", scores.len());
        }
        steps += 1;
        let _ = sender.send(result);
    }
}

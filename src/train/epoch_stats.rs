use serde::{Serialize, Deserialize};

/// Per-epoch training statistics returned by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop also sends one `EpochStats` value at the end of every completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Samples whose thresholded prediction matched their label.
    pub correct: usize,
    /// Samples that were forwarded; skipped samples are not counted.
    pub total: usize,
    /// Samples dropped because they could not be loaded or preprocessed.
    pub skipped: usize,
    /// `100 * correct / total`.
    pub accuracy: f64,
    /// Mean binary cross-entropy over the counted samples.
    pub mean_loss: f64,
    /// Learning rate in effect during this epoch.
    pub learning_rate: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

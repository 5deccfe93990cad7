use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`      — total number of full passes over the training data
/// - `batch_size`  — samples between weight updates under the accumulated
///                   rule; ignored by the immediate rule
/// - `lr_decay`    — factor the learning rate is multiplied by after every epoch
/// - `progress_tx` — optional channel sender; one `EpochStats` is sent per
///                   completed epoch.  If the receiver is dropped the loop
///                   terminates early.
/// - `stop_flag`   — optional atomic flag; when set to `true` from another
///                   thread the loop terminates after the current epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub lr_decay: f64,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    #[serde(skip)]
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no progress channel and no stop flag.
    pub fn new(epochs: usize, batch_size: usize, lr_decay: f64) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            lr_decay,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be at least 1".into()));
        }
        if !(self.lr_decay > 0.0 && self.lr_decay <= 1.0) {
            return Err(Error::InvalidConfig("lr_decay must be in (0, 1]".into()));
        }
        Ok(())
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(10, 32, 0.95)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: TrainConfig = serde_json::from_str(r#"{"epochs": 3}"#).unwrap();
        assert_eq!(cfg.epochs, 3);
        assert_eq!(cfg.batch_size, 32);
        assert_eq!(cfg.lr_decay, 0.95);
        assert!(cfg.progress_tx.is_none());
    }

    #[test]
    fn rejects_degenerate_values() {
        assert!(TrainConfig::new(1, 0, 0.9).validate().is_err());
        assert!(TrainConfig::new(1, 4, 0.0).validate().is_err());
        assert!(TrainConfig::new(1, 4, 1.5).validate().is_err());
        assert!(TrainConfig::new(1, 4, 1.0).validate().is_ok());
    }
}

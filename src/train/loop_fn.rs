use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::data::source::{check_input, Preprocessor, SampleSource};
use crate::error::{Error, Result};
use crate::loss::bce::BceLoss;
use crate::network::classes::Class;
use crate::network::network::Network;
use crate::optim::sgd::{LrSchedule, UpdateRule};
use crate::train::accuracy::Accuracy;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs and returns the statistics of
/// every completed epoch.
///
/// Each epoch visits the source in a fresh random order. Samples that fail to
/// load or preprocess are logged and skipped; they count toward neither
/// `total` nor `correct`. Under the accumulated rule every layer is updated
/// after every `batch_size` positions of the shuffled order and after the
/// last one. After each epoch the learning rate is multiplied by
/// `config.lr_decay`.
///
/// # Errors
/// - `InvalidConfig` for a zero batch size or a decay outside (0, 1]
/// - `NoSamples` if the source is empty
/// - `Topology` if the preprocessor's output length is not the network's
///   input width
/// - `NoUsableSamples` if every sample of an epoch was skipped. Epochs that
///   completed before it have already changed the weights; their statistics
///   are logged but not returned.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_loop<S, P>(
    network: &mut Network,
    source: &S,
    preprocessor: &P,
    config: &TrainConfig,
) -> Result<Vec<EpochStats>>
where
    S: SampleSource,
    P: Preprocessor<S::Raw>,
{
    config.validate()?;
    if source.is_empty() {
        return Err(Error::NoSamples);
    }
    if preprocessor.input_len() != network.input_size() {
        return Err(Error::Topology(format!(
            "preprocessor produces {} values but the network expects {}",
            preprocessor.input_len(),
            network.input_size()
        )));
    }

    let mut schedule = LrSchedule::new(network.learning_rate(), config.lr_decay);
    let mut history: Vec<EpochStats> = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            info!(epoch, "stop requested, ending training");
            break;
        }

        let t_start = Instant::now();
        let rate = schedule.current;

        // ── One full pass over the training data ───────────────────────────
        let tally = run_one_epoch(network, source, preprocessor, config.batch_size)?;
        if tally.accuracy.total == 0 {
            for done in &history {
                warn!(?done, "completed epoch before training failed");
            }
            return Err(Error::NoUsableSamples { epoch });
        }

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            correct: tally.accuracy.correct,
            total: tally.accuracy.total,
            skipped: tally.skipped,
            accuracy: tally.accuracy.percent(),
            mean_loss: tally.loss / tally.accuracy.total as f64,
            learning_rate: rate,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        info!(
            epoch,
            total_epochs = config.epochs,
            accuracy = %format!("{:.2}%", stats.accuracy),
            loss = %format!("{:.6}", stats.mean_loss),
            skipped = stats.skipped,
            learning_rate = rate,
            elapsed_ms = stats.elapsed_ms,
            "epoch finished"
        );

        network.set_learning_rate(schedule.step_epoch());
        history.push(stats.clone());

        // ── Emit progress ─────────────────────────────────────────────────
        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    Ok(history)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct EpochTally {
    accuracy: Accuracy,
    skipped: usize,
    loss: f64,
}

fn stop_requested(config: &TrainConfig) -> bool {
    config.stop_flag.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
}

/// Runs one shuffled pass over the source.
fn run_one_epoch<S, P>(
    network: &mut Network,
    source: &S,
    preprocessor: &P,
    batch_size: usize,
) -> Result<EpochTally>
where
    S: SampleSource,
    P: Preprocessor<S::Raw>,
{
    let n = source.len();
    let accumulate = matches!(network.rule(), UpdateRule::Accumulated { .. });
    let mut tally = EpochTally::default();

    // Shuffle sample order each epoch.
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(network.rng_mut());

    for (pos, &idx) in indices.iter().enumerate() {
        match load_sample(source, preprocessor, idx, network.input_size()) {
            Ok(input) => {
                let expected = source.label(idx);
                let output = network.forward(&input)?;
                let target = [expected.target()];

                tally.accuracy.record(Class::from_score(output[0]), expected);
                tally.loss += BceLoss::loss(&output, &target);

                network.backward(&BceLoss::logit_gradient(&output, &target))?;
            }
            Err(e) => {
                warn!(index = idx, error = %e, "skipping unreadable sample");
                tally.skipped += 1;
            }
        }

        let batch_end = (pos + 1) % batch_size == 0 || pos + 1 == n;
        if accumulate && batch_end {
            network.update()?;
            debug!(position = pos + 1, "applied mini-batch update");
        }
    }

    Ok(tally)
}

/// Loads and preprocesses one sample, checking it fits the network.
fn load_sample<S, P>(source: &S, preprocessor: &P, idx: usize, input_size: usize) -> Result<Vec<f64>>
where
    S: SampleSource,
    P: Preprocessor<S::Raw>,
{
    let raw = source.raw(idx)?;
    let input = preprocessor.preprocess(&raw)?;
    check_input(&input, input_size)?;
    Ok(input)
}

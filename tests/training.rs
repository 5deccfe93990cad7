// End-to-end training behaviour on small synthetic datasets.

use std::cell::Cell;

use approx::assert_relative_eq;

use ferrite_classify::loss::bce::BceLoss;
use ferrite_classify::{
    ActivationFunction, Class, Error, Network, NetworkSpec, PreprocessError, Result, SampleSource, TrainConfig,
    UpdateRule, VectorPreprocessor, VectorSource,
};

const WIDTH: usize = 4;

// All-zero vectors are Negative, all-one vectors are Positive.
fn separable(per_class: usize) -> VectorSource {
    let mut src = VectorSource::default();
    for _ in 0..per_class {
        src.push(vec![0.0; WIDTH], Class::Negative);
        src.push(vec![1.0; WIDTH], Class::Positive);
    }
    src
}

fn spec(hidden: ActivationFunction, rule: UpdateRule, learning_rate: f64) -> NetworkSpec {
    let mut spec = NetworkSpec::from_widths("synthetic", WIDTH, &[8], hidden);
    spec.optimizer.rule = rule;
    spec.optimizer.learning_rate = learning_rate;
    spec.seed = Some(1);
    spec
}

#[test]
fn momentum_network_separates_zeros_from_ones() {
    let mut net = Network::new(&spec(
        ActivationFunction::Sigmoid,
        UpdateRule::Accumulated { momentum: 0.9 },
        0.1,
    ))
    .unwrap();
    let history = net
        .train(&separable(10), &VectorPreprocessor::new(WIDTH), &TrainConfig::new(60, 4, 0.99))
        .unwrap();

    assert_eq!(history.len(), 60);
    let last = history.last().unwrap();
    assert!(last.accuracy >= 95.0, "final accuracy {}", last.accuracy);
    assert!(last.mean_loss < history[0].mean_loss);

    let pre = VectorPreprocessor::new(WIDTH);
    assert_eq!(net.predict(&vec![0.0; WIDTH], &pre).unwrap().class, Class::Negative);
    assert_eq!(net.predict(&vec![1.0; WIDTH], &pre).unwrap().class, Class::Positive);
}

#[test]
fn immediate_relu_network_separates_zeros_from_ones() {
    let mut net = Network::new(&spec(ActivationFunction::ReLU, UpdateRule::Immediate, 0.1)).unwrap();
    let history = net
        .train(&separable(10), &VectorPreprocessor::new(WIDTH), &TrainConfig::new(60, 4, 0.99))
        .unwrap();

    let last = history.last().unwrap();
    assert!(last.accuracy >= 95.0, "final accuracy {}", last.accuracy);

    let pre = VectorPreprocessor::new(WIDTH);
    assert_eq!(net.predict(&vec![0.0; WIDTH], &pre).unwrap().class, Class::Negative);
    assert_eq!(net.predict(&vec![1.0; WIDTH], &pre).unwrap().class, Class::Positive);
}

#[test]
fn skipped_samples_never_reach_the_counters() {
    let mut src = separable(3);
    src.push(Vec::new(), Class::Positive);
    src.push(vec![1.0; WIDTH + 1], Class::Negative);
    src.push(Vec::new(), Class::Negative);

    let mut net = Network::new(&spec(
        ActivationFunction::Sigmoid,
        UpdateRule::Accumulated { momentum: 0.9 },
        0.05,
    ))
    .unwrap();
    let history = net
        .train(&src, &VectorPreprocessor::new(WIDTH), &TrainConfig::new(3, 2, 0.95))
        .unwrap();

    for stats in &history {
        assert_eq!(stats.total, 6);
        assert_eq!(stats.skipped, 3);
        assert!(stats.correct <= stats.total);
        assert_eq!(stats.accuracy, 100.0 * stats.correct as f64 / stats.total as f64);
    }
}

#[test]
fn learning_rate_decays_once_per_epoch() {
    let initial = 0.05;
    let decay = 0.9;
    let epochs = 5;
    let mut net = Network::new(&spec(
        ActivationFunction::Sigmoid,
        UpdateRule::Accumulated { momentum: 0.9 },
        initial,
    ))
    .unwrap();
    let history = net
        .train(&separable(2), &VectorPreprocessor::new(WIDTH), &TrainConfig::new(epochs, 2, decay))
        .unwrap();

    for (i, stats) in history.iter().enumerate() {
        assert_relative_eq!(stats.learning_rate, initial * decay.powi(i as i32), max_relative = 1e-12);
    }
    let expected = initial * decay.powi(epochs as i32);
    assert_relative_eq!(net.learning_rate(), expected, max_relative = 1e-12);
    for layer in net.layers() {
        assert_relative_eq!(layer.learning_rate, expected, max_relative = 1e-12);
    }
}

#[test]
fn seeded_training_is_reproducible() {
    let run = || {
        let mut net = Network::new(&spec(
            ActivationFunction::Sigmoid,
            UpdateRule::Accumulated { momentum: 0.9 },
            0.1,
        ))
        .unwrap();
        let history = net
            .train(&separable(4), &VectorPreprocessor::new(WIDTH), &TrainConfig::new(5, 3, 0.95))
            .unwrap();
        let losses: Vec<f64> = history.iter().map(|s| s.mean_loss).collect();
        (losses, net.layers()[0].weights.clone())
    };
    assert_eq!(run(), run());
}

#[test]
fn predict_on_invalid_sample_is_an_error() {
    let mut net = Network::new(&spec(ActivationFunction::Sigmoid, UpdateRule::default(), 0.1)).unwrap();
    let pre = VectorPreprocessor::new(WIDTH);
    assert!(matches!(
        net.predict(&Vec::new(), &pre),
        Err(Error::Preprocess(PreprocessError::Empty))
    ));
    assert!(matches!(
        net.predict(&vec![0.5; 2], &pre),
        Err(Error::Preprocess(PreprocessError::LengthMismatch { .. }))
    ));
}

#[test]
fn non_finite_samples_are_rejected_and_skipped() {
    let mut net = Network::new(&spec(ActivationFunction::Sigmoid, UpdateRule::default(), 0.1)).unwrap();
    let pre = VectorPreprocessor::new(WIDTH);
    assert!(matches!(
        net.predict(&vec![f64::NAN, 0.0, 0.0, 0.0], &pre),
        Err(Error::Preprocess(PreprocessError::NonFinite { index: 0 }))
    ));
    assert!(matches!(
        net.classify(&[0.0, 0.0, f64::INFINITY, 0.0]),
        Err(Error::Preprocess(PreprocessError::NonFinite { index: 2 }))
    ));

    let mut src = separable(2);
    src.push(vec![f64::NAN, 0.0, 0.0, 0.0], Class::Positive);
    let history = net.train(&src, &pre, &TrainConfig::new(2, 2, 0.95)).unwrap();
    for stats in &history {
        assert_eq!(stats.total, 4);
        assert_eq!(stats.skipped, 1);
        assert!(stats.mean_loss.is_finite());
    }
    assert!(net.layers().iter().all(|l| l.weights.data.iter().flatten().all(|w| w.is_finite())));
}

const SAMPLE: [f64; WIDTH] = [0.3, 0.7, 0.1, 0.9];

fn momentum_net() -> Network {
    Network::new(&spec(ActivationFunction::Sigmoid, UpdateRule::Accumulated { momentum: 0.9 }, 0.1)).unwrap()
}

// Replays training on SAMPLE by hand, calling `update` after each group.
fn replay(groups: &[usize]) -> Network {
    let mut net = momentum_net();
    for &size in groups {
        for _ in 0..size {
            let out = net.forward(&SAMPLE).unwrap();
            net.backward(&BceLoss::logit_gradient(&out, &[1.0])).unwrap();
        }
        net.update().unwrap();
    }
    net
}

fn params(net: &Network) -> Vec<(Vec<Vec<f64>>, Vec<f64>)> {
    net.layers().iter().map(|l| (l.weights.data.clone(), l.biases.clone())).collect()
}

#[test]
fn updates_every_batch_and_after_the_last_position() {
    let src = VectorSource::new(vec![(SAMPLE.to_vec(), Class::Positive); 3]);
    let mut net = momentum_net();
    net.train(&src, &VectorPreprocessor::new(WIDTH), &TrainConfig::new(1, 2, 1.0)).unwrap();

    assert_eq!(params(&net), params(&replay(&[2, 1])));
    assert_ne!(params(&net), params(&replay(&[1, 1, 1])));
}

// Identical samples, except that the `fail_on`-th load yields an empty vector.
struct FailsOnCall {
    len: usize,
    fail_on: usize,
    calls: Cell<usize>,
}

impl SampleSource for FailsOnCall {
    type Raw = Vec<f64>;

    fn len(&self) -> usize {
        self.len
    }

    fn label(&self, _: usize) -> Class {
        Class::Positive
    }

    fn raw(&self, _: usize) -> Result<Vec<f64>> {
        self.calls.set(self.calls.get() + 1);
        if self.calls.get() == self.fail_on {
            Ok(Vec::new())
        } else {
            Ok(SAMPLE.to_vec())
        }
    }
}

#[test]
fn skipped_sample_still_counts_toward_the_batch() {
    let src = FailsOnCall { len: 4, fail_on: 2, calls: Cell::new(0) };
    let mut net = momentum_net();
    let history = net.train(&src, &VectorPreprocessor::new(WIDTH), &TrainConfig::new(1, 2, 1.0)).unwrap();
    assert_eq!((history[0].total, history[0].skipped), (3, 1));

    assert_eq!(params(&net), params(&replay(&[1, 2])));
    assert_ne!(params(&net), params(&replay(&[2, 1])));
}

#[test]
fn width_mismatch_fails_at_construction() {
    let mut bad = spec(ActivationFunction::Sigmoid, UpdateRule::default(), 0.1);
    bad.layers[1].input_size = 7;
    assert!(matches!(Network::new(&bad), Err(Error::Topology(_))));
}

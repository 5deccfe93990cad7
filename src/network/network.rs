use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::data::source::{check_input, Preprocessor, SampleSource};
use crate::error::{Error, Result};
use crate::layers::dense::Layer;
use crate::network::classes::Prediction;
use crate::network::spec::NetworkSpec;
use crate::optim::sgd::UpdateRule;
use crate::train::epoch_stats::EpochStats;
use crate::train::loop_fn::train_loop;
use crate::train::train_config::TrainConfig;

/// An ordered, width-checked stack of dense layers ending in one sigmoid
/// unit.
///
/// The network owns the random generator used for weight initialization and
/// for shuffling during training, so a seeded spec gives reproducible runs.
#[derive(Debug)]
pub struct Network {
    pub name: String,
    layers: Vec<Layer>,
    input_size: usize,
    learning_rate: f64,
    rule: UpdateRule,
    rng: StdRng,
}

impl Network {
    /// Validates `spec` and builds its layers with He-initialized weights.
    pub fn new(spec: &NetworkSpec) -> Result<Network> {
        spec.validate()?;
        let mut rng = match spec.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let lr = spec.optimizer.learning_rate;
        let rule = spec.optimizer.rule;
        let layers = spec.layers.iter()
            .map(|l| Layer::new(l.size, l.input_size, l.activation, lr, rule, &mut rng))
            .collect();
        debug!(
            name = %spec.name,
            input_size = spec.input_size,
            layers = spec.layers.len(),
            rule = rule.name(),
            "constructed network"
        );
        Ok(Network {
            name: spec.name.clone(),
            layers,
            input_size: spec.input_size,
            learning_rate: lr,
            rule,
            rng,
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn rule(&self) -> UpdateRule {
        self.rule
    }

    /// Rate the next update will use.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Sets the rate on the network and on every layer.
    pub fn set_learning_rate(&mut self, rate: f64) {
        self.learning_rate = rate;
        for layer in &mut self.layers {
            layer.learning_rate = rate;
        }
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Forward pass; every layer caches its input and output for backprop.
    ///
    /// Empty, wrongly sized or non-finite inputs are rejected before any
    /// layer runs.
    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        check_input(input, self.input_size)?;
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.forward(&current);
        }
        Ok(current)
    }

    /// Backpropagates `output_grad`, the loss gradient with respect to the
    /// output layer's pre-activation sum, through every layer in reverse.
    ///
    /// Hidden layers receive the gradient in output space and have their
    /// activation derivative folded in here. Under the accumulated rule this
    /// only fills the gradient accumulators; under the immediate rule each
    /// layer steps right away.
    pub fn backward(&mut self, output_grad: &[f64]) -> Result<()> {
        let last = self.layers.len() - 1;
        let mut grad = output_grad.to_vec();
        for (i, layer) in self.layers.iter_mut().enumerate().rev() {
            if i != last {
                grad = layer.activation_gradient(&grad);
            }
            grad = match self.rule {
                UpdateRule::Accumulated { .. } => layer.backward(&grad)?,
                UpdateRule::Immediate => {
                    let lr = layer.learning_rate;
                    layer.step(lr, &grad)?
                }
            };
        }
        Ok(())
    }

    /// Applies and decays every layer's accumulated gradients.
    pub fn update(&mut self) -> Result<()> {
        for layer in &mut self.layers {
            layer.update()?;
        }
        Ok(())
    }

    /// Trains on `source` for `config.epochs` epochs; see `train_loop`.
    pub fn train<S, P>(&mut self, source: &S, preprocessor: &P, config: &TrainConfig) -> Result<Vec<EpochStats>>
    where
        S: SampleSource,
        P: Preprocessor<S::Raw>,
    {
        train_loop(self, source, preprocessor, config)
    }

    /// Preprocesses one raw sample and classifies it.
    ///
    /// Unlike training, a sample that fails preprocessing is an error here.
    pub fn predict<Raw, P>(&mut self, raw: &Raw, preprocessor: &P) -> Result<Prediction>
    where
        Raw: ?Sized,
        P: Preprocessor<Raw>,
    {
        let input = preprocessor.preprocess(raw)?;
        self.classify(&input)
    }

    /// Classifies an already-preprocessed input vector.
    pub fn classify(&mut self, input: &[f64]) -> Result<Prediction> {
        let output = self.forward(input)?;
        let score = *output.first().ok_or_else(|| Error::Topology("network produced no output".into()))?;
        Ok(Prediction::from_score(score))
    }
}

use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::optim::sgd::{OptimizerSpec, UpdateRule};

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`       — number of neurons in this layer
/// - `input_size` — output size of the previous layer, or the sample length
///                  for the first layer
/// - `activation` — activation function applied after the linear transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationFunction,
}

/// A serializable description of a classifier's topology and optimizer.
///
/// This is architecture configuration only; trained weights are never
/// written anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name used in logs.
    pub name: String,
    /// Length of a preprocessed sample.
    pub input_size: usize,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub optimizer: OptimizerSpec,
    /// Seed for weight initialization and shuffling; `None` draws from OS
    /// entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkSpec {
    /// `input_size → 128 → 64 → 1`, sigmoid throughout.
    pub fn binary_image_classifier(input_size: usize) -> NetworkSpec {
        NetworkSpec::from_widths("binary-image-classifier", input_size, &[128, 64], ActivationFunction::Sigmoid)
    }

    /// Chains `input_size → hidden[0] → … → 1`. Hidden layers use `hidden_activation`,
    /// the output layer is always sigmoid.
    pub fn from_widths(
        name: &str,
        input_size: usize,
        hidden: &[usize],
        hidden_activation: ActivationFunction,
    ) -> NetworkSpec {
        let mut layers = Vec::with_capacity(hidden.len() + 1);
        let mut prev = input_size;
        for &size in hidden {
            layers.push(LayerSpec { size, input_size: prev, activation: hidden_activation });
            prev = size;
        }
        layers.push(LayerSpec { size: 1, input_size: prev, activation: ActivationFunction::Sigmoid });
        NetworkSpec {
            name: name.to_string(),
            input_size,
            layers,
            optimizer: OptimizerSpec::default(),
            seed: None,
        }
    }

    /// Checks that the layer widths chain from `input_size` to a single
    /// sigmoid output and that the optimizer settings are usable.
    pub fn validate(&self) -> Result<()> {
        let Some(last) = self.layers.last() else {
            return Err(Error::Topology("network has no layers".into()));
        };
        let mut expected = self.input_size;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.size == 0 || layer.input_size == 0 {
                return Err(Error::Topology(format!("layer {i} has a zero width")));
            }
            if layer.input_size != expected {
                return Err(Error::Topology(format!(
                    "layer {i} expects {} inputs but receives {expected}",
                    layer.input_size
                )));
            }
            expected = layer.size;
        }
        if last.size != 1 {
            return Err(Error::Topology(format!(
                "output layer must have exactly 1 unit, found {}",
                last.size
            )));
        }
        if last.activation != ActivationFunction::Sigmoid {
            return Err(Error::Topology("output layer must use the sigmoid activation".into()));
        }
        if !(self.optimizer.learning_rate > 0.0) {
            return Err(Error::InvalidConfig("learning_rate must be positive".into()));
        }
        if let UpdateRule::Accumulated { momentum } = self.optimizer.rule {
            if !(0.0..1.0).contains(&momentum) {
                return Err(Error::InvalidConfig("momentum must be in [0, 1)".into()));
            }
        }
        Ok(())
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

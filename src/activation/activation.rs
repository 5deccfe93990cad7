use serde::{Serialize, Deserialize};

/// Nonlinearity applied by a layer after its affine transform.
///
/// Fixed per layer. `Sigmoid` saturates into (0, 1) and is the only valid
/// choice for the output layer; `ReLU` maps into [0, ∞) and is available for
/// hidden layers. Mixing them changes gradient scale, so pick the learning
/// rate with the hidden activation in mind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Sigmoid,
    #[serde(rename = "relu")]
    ReLU,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
        }
    }

    /// Derivative expressed in terms of the activation's *output* `y = f(x)`.
    ///
    /// Both nonlinearities allow this, so a layer only has to cache its
    /// post-activation output.
    pub fn derivative_from_output(&self, y: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => y * (1.0 - y),
            ActivationFunction::ReLU => if y > 0.0 { 1.0 } else { 0.0 },
        }
    }
}

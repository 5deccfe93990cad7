use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::optim::sgd::UpdateRule;

/// One affine transform followed by a fixed nonlinearity.
///
/// `forward` keeps a single-slot cache of the last input and output. That
/// cache is valid until the next `forward` call and is what `backward`,
/// `step` and `activation_gradient` read; calling them before any `forward`
/// is a contract violation and panics.
///
/// Gradients passed to `backward` and `step` are with respect to the
/// pre-activation sums. Use `activation_gradient` to fold the activation
/// derivative into a gradient that arrives in output space.
#[derive(Debug)]
pub struct Layer{
    pub input_size: usize,
    pub size: usize,
    pub weights: Matrix,
    pub biases: Vec<f64>,
    pub activator: ActivationFunction,
    pub learning_rate: f64,
    rule: UpdateRule,
    last_input: Vec<f64>,
    last_output: Vec<f64>,
    weight_grads: Matrix,
    bias_grads: Vec<f64>,
}

impl Layer {
    /// He-initialized weights, zero biases, zero accumulators.
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        learning_rate: f64,
        rule: UpdateRule,
        rng: &mut R,
    ) -> Layer {
        Layer {
            input_size,
            size,
            weights: Matrix::he(size, input_size, rng),
            biases: vec![0.0; size],
            activator: activation,
            learning_rate,
            rule,
            last_input: Vec::new(),
            last_output: Vec::new(),
            weight_grads: Matrix::zeros(size, input_size),
            bias_grads: vec![0.0; size],
        }
    }

    pub fn rule(&self) -> UpdateRule {
        self.rule
    }

    pub fn weight_gradients(&self) -> &Matrix {
        &self.weight_grads
    }

    pub fn bias_gradients(&self) -> &[f64] {
        &self.bias_grads
    }

    /// Output of the most recent `forward` call.
    pub fn last_output(&self) -> &[f64] {
        &self.last_output
    }

    pub fn forward(&mut self, input: &[f64]) -> Vec<f64> {
        assert_eq!(input.len(), self.input_size, "layer input has the wrong width");
        let output: Vec<f64> = self.weights.mul_vec(input).into_iter()
            .zip(&self.biases)
            .map(|(z, b)| self.activator.function(z + b))
            .collect();
        self.last_input.clear();
        self.last_input.extend_from_slice(input);
        self.last_output.clone_from(&output);
        output
    }

    /// Multiplies `upstream` (∂L/∂output) by the activation derivative at the
    /// cached output, giving ∂L/∂sum.
    pub fn activation_gradient(&self, upstream: &[f64]) -> Vec<f64> {
        self.assert_cached();
        assert_eq!(upstream.len(), self.size, "upstream gradient has the wrong width");
        upstream.iter().zip(&self.last_output)
            .map(|(g, &y)| g * self.activator.derivative_from_output(y))
            .collect()
    }

    /// Accumulates parameter gradients for `grad` (∂L/∂sum) and returns the
    /// gradient with respect to this layer's input. Weights are untouched.
    pub fn backward(&mut self, grad: &[f64]) -> Result<Vec<f64>> {
        if !matches!(self.rule, UpdateRule::Accumulated { .. }) {
            return Err(self.mismatch("backward"));
        }
        self.assert_cached();
        self.weight_grads.add_outer(grad, &self.last_input, 1.0);
        for (acc, g) in self.bias_grads.iter_mut().zip(grad) {
            *acc += g;
        }
        Ok(self.weights.transpose_mul_vec(grad))
    }

    /// Applies the accumulated gradients with the layer's learning rate, then
    /// decays the accumulators by the momentum factor.
    pub fn update(&mut self) -> Result<()> {
        let momentum = match self.rule {
            UpdateRule::Accumulated { momentum } => momentum,
            UpdateRule::Immediate => return Err(self.mismatch("update")),
        };
        let lr = self.learning_rate;
        self.weights.sub_scaled(&self.weight_grads, lr);
        for (b, g) in self.biases.iter_mut().zip(&self.bias_grads) {
            *b -= lr * g;
        }
        self.weight_grads.scale(momentum);
        for g in self.bias_grads.iter_mut() {
            *g *= momentum;
        }
        Ok(())
    }

    /// Single-sample update without accumulators. Returns the input gradient,
    /// computed with the weights as they were before the step.
    pub fn step(&mut self, learning_rate: f64, grad: &[f64]) -> Result<Vec<f64>> {
        if self.rule != UpdateRule::Immediate {
            return Err(self.mismatch("step"));
        }
        self.assert_cached();
        let input_grad = self.weights.transpose_mul_vec(grad);
        self.weights.add_outer(grad, &self.last_input, -learning_rate);
        for (b, g) in self.biases.iter_mut().zip(grad) {
            *b -= learning_rate * g;
        }
        Ok(input_grad)
    }

    fn assert_cached(&self) {
        assert!(
            self.last_input.len() == self.input_size && self.last_output.len() == self.size,
            "forward must run before backpropagating through a layer"
        );
    }

    fn mismatch(&self, attempted: &'static str) -> Error {
        Error::UpdateRuleMismatch { rule: self.rule.name(), attempted }
    }
}

/// Binary cross-entropy for a sigmoid output unit.
pub struct BceLoss;

const EPS: f64 = 1e-12;

impl BceLoss {
    /// Scalar BCE: -mean(y·log(p+ε) + (1-y)·log(1-p+ε))
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| -(y * (p + EPS).ln() + (1.0 - y) * (1.0 - p + EPS).ln()))
            .sum::<f64>() / n
    }

    /// Gradient of BCE composed with the sigmoid, taken with respect to the
    /// output layer's pre-activation sum: `p - y`.
    ///
    /// The sigmoid derivative cancels against the BCE denominator, so this is
    /// what the network feeds straight into the output layer's `backward`.
    pub fn logit_gradient(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| p - y)
            .collect()
    }
}

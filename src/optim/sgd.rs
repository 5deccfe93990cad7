use serde::{Serialize, Deserialize};

/// How a layer turns gradients into weight changes.
///
/// The two rules are mutually exclusive; a network uses one rule for every
/// layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateRule {
    /// Gradients are summed into per-layer accumulators by `backward` and
    /// applied by `update()` at mini-batch boundaries. After each update the
    /// accumulators are multiplied by `momentum` instead of being cleared, so
    /// part of the signal carries into the next batch.
    Accumulated { momentum: f64 },
    /// Every sample's gradient is applied immediately by `step()`; nothing is
    /// accumulated and there is no momentum.
    Immediate,
}

impl UpdateRule {
    pub fn name(&self) -> &'static str {
        match self {
            UpdateRule::Accumulated { .. } => "accumulated",
            UpdateRule::Immediate => "immediate",
        }
    }
}

impl Default for UpdateRule {
    fn default() -> Self {
        UpdateRule::Accumulated { momentum: 0.9 }
    }
}

/// Initial learning rate plus the update rule applied by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSpec {
    pub learning_rate: f64,
    #[serde(default)]
    pub rule: UpdateRule,
}

impl Default for OptimizerSpec {
    fn default() -> Self {
        OptimizerSpec { learning_rate: 0.01, rule: UpdateRule::default() }
    }
}

/// Multiplicative per-epoch learning-rate decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LrSchedule {
    pub current: f64,
    pub decay: f64,
}

impl LrSchedule {
    pub fn new(initial: f64, decay: f64) -> LrSchedule {
        LrSchedule { current: initial, decay }
    }

    /// Advances one epoch and returns the new rate.
    pub fn step_epoch(&mut self) -> f64 {
        self.current *= self.decay;
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn schedule_decays_geometrically() {
        let mut lr = LrSchedule::new(0.1, 0.95);
        for _ in 0..7 {
            lr.step_epoch();
        }
        assert_relative_eq!(lr.current, 0.1 * 0.95f64.powi(7), epsilon = 1e-15);
    }

    #[test]
    fn update_rule_json_shape() {
        let rule: UpdateRule = serde_json::from_str(r#"{"type":"accumulated","momentum":0.5}"#).unwrap();
        assert_eq!(rule, UpdateRule::Accumulated { momentum: 0.5 });
        let rule: UpdateRule = serde_json::from_str(r#"{"type":"immediate"}"#).unwrap();
        assert_eq!(rule, UpdateRule::Immediate);
    }
}

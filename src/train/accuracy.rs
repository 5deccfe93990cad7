use crate::network::classes::Class;

/// Running count of correct binary predictions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accuracy {
    pub correct: usize,
    pub total: usize,
}

impl Accuracy {
    pub fn record(&mut self, predicted: Class, actual: Class) {
        if predicted == actual {
            self.correct += 1;
        }
        self.total += 1;
    }

    /// `100 * correct / total`, or 0 when nothing was recorded.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * self.correct as f64 / self.total as f64
    }
}

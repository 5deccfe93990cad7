use serde::{Deserialize, Serialize};

/// One of the two categories the network separates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Class {
    Negative,
    Positive,
}

impl Class {
    /// Decision threshold on the sigmoid score.
    pub const THRESHOLD: f64 = 0.5;

    pub fn from_score(score: f64) -> Class {
        if score > Class::THRESHOLD { Class::Positive } else { Class::Negative }
    }

    /// Training target for the output unit.
    pub fn target(self) -> f64 {
        match self {
            Class::Negative => 0.0,
            Class::Positive => 1.0,
        }
    }
}

/// Human-readable names for the two classes, plus the directory names the
/// image folder source looks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassLabels {
    pub negative: String,
    pub positive: String,
    pub negative_dir: String,
    pub positive_dir: String,
}

impl ClassLabels {
    pub fn name(&self, class: Class) -> &str {
        match class {
            Class::Negative => &self.negative,
            Class::Positive => &self.positive,
        }
    }

    /// Maps a class directory name to its class; other names map to `None`.
    pub fn class_for_dir(&self, dir_name: &str) -> Option<Class> {
        if dir_name == self.positive_dir {
            Some(Class::Positive)
        } else if dir_name == self.negative_dir {
            Some(Class::Negative)
        } else {
            None
        }
    }
}

impl Default for ClassLabels {
    fn default() -> Self {
        ClassLabels {
            negative: "cat".to_string(),
            positive: "dog".to_string(),
            negative_dir: "cats".to_string(),
            positive_dir: "dogs".to_string(),
        }
    }
}

/// Output of `Network::predict`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class: Class,
    /// Sigmoid output in [0, 1]; above 0.5 means `Positive`.
    pub score: f64,
}

impl Prediction {
    pub fn from_score(score: f64) -> Prediction {
        Prediction { class: Class::from_score(score), score }
    }

    pub fn label<'a>(&self, labels: &'a ClassLabels) -> &'a str {
        labels.name(self.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strict() {
        assert_eq!(Class::from_score(0.5), Class::Negative);
        assert_eq!(Class::from_score(0.500001), Class::Positive);
        assert_eq!(Class::from_score(0.0), Class::Negative);
    }

    #[test]
    fn labels_map_both_ways() {
        let labels = ClassLabels::default();
        assert_eq!(Prediction::from_score(0.9).label(&labels), "dog");
        assert_eq!(Prediction::from_score(0.1).label(&labels), "cat");
        assert_eq!(labels.class_for_dir("dogs"), Some(Class::Positive));
        assert_eq!(labels.class_for_dir("cats"), Some(Class::Negative));
        assert_eq!(labels.class_for_dir("birds"), None);
    }
}

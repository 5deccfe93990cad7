use crate::error::{PreprocessError, Result};
use crate::network::classes::Class;

/// A finite, indexable collection of labeled raw samples.
///
/// Indexable so the training loop can visit it in a fresh random order every
/// epoch; `raw` is called lazily, one sample at a time.
pub trait SampleSource {
    type Raw;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn label(&self, index: usize) -> Class;

    /// Loads sample `index`. Failures here are treated like preprocessing
    /// failures by the training loop: the sample is skipped.
    fn raw(&self, index: usize) -> Result<Self::Raw>;
}

/// Turns a raw sample into the fixed-length vector the network consumes.
///
/// The same preprocessor must be used for training and prediction.
pub trait Preprocessor<Raw: ?Sized> {
    /// Length of every vector `preprocess` returns.
    fn input_len(&self) -> usize;

    fn preprocess(&self, raw: &Raw) -> std::result::Result<Vec<f64>, PreprocessError>;
}

/// Checks that `input` is a non-empty, finite vector of `expected` values.
pub fn check_input(input: &[f64], expected: usize) -> std::result::Result<(), PreprocessError> {
    if input.is_empty() {
        return Err(PreprocessError::Empty);
    }
    if input.len() != expected {
        return Err(PreprocessError::LengthMismatch { expected, actual: input.len() });
    }
    if let Some(index) = input.iter().position(|v| !v.is_finite()) {
        return Err(PreprocessError::NonFinite { index });
    }
    Ok(())
}

/// In-memory labeled vectors.
#[derive(Debug, Clone, Default)]
pub struct VectorSource {
    samples: Vec<(Vec<f64>, Class)>,
}

impl VectorSource {
    pub fn new(samples: Vec<(Vec<f64>, Class)>) -> VectorSource {
        VectorSource { samples }
    }

    pub fn push(&mut self, sample: Vec<f64>, class: Class) {
        self.samples.push((sample, class));
    }
}

impl SampleSource for VectorSource {
    type Raw = Vec<f64>;

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn label(&self, index: usize) -> Class {
        self.samples[index].1
    }

    fn raw(&self, index: usize) -> Result<Vec<f64>> {
        Ok(self.samples[index].0.clone())
    }
}

/// Passes already-numeric samples through after checking their length.
#[derive(Debug, Clone, Copy)]
pub struct VectorPreprocessor {
    pub len: usize,
}

impl VectorPreprocessor {
    pub fn new(len: usize) -> VectorPreprocessor {
        VectorPreprocessor { len }
    }
}

impl Preprocessor<Vec<f64>> for VectorPreprocessor {
    fn input_len(&self) -> usize {
        self.len
    }

    fn preprocess(&self, raw: &Vec<f64>) -> std::result::Result<Vec<f64>, PreprocessError> {
        check_input(raw, self.len)?;
        Ok(raw.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_preprocessor_checks_shape() {
        let p = VectorPreprocessor::new(3);
        assert_eq!(p.preprocess(&vec![1.0, 2.0, 3.0]).unwrap(), vec![1.0, 2.0, 3.0]);
        assert!(matches!(p.preprocess(&Vec::new()), Err(PreprocessError::Empty)));
        assert!(matches!(
            p.preprocess(&vec![1.0]),
            Err(PreprocessError::LengthMismatch { expected: 3, actual: 1 })
        ));
        assert!(matches!(
            p.preprocess(&vec![1.0, f64::INFINITY, f64::NAN]),
            Err(PreprocessError::NonFinite { index: 1 })
        ));
    }

    #[test]
    fn vector_source_indexes_samples() {
        let mut src = VectorSource::default();
        assert!(src.is_empty());
        src.push(vec![0.0], Class::Negative);
        src.push(vec![1.0], Class::Positive);
        assert_eq!(src.len(), 2);
        assert_eq!(src.label(1), Class::Positive);
        assert_eq!(src.raw(0).unwrap(), vec![0.0]);
    }
}

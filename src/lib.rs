pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod config;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::classes::{Class, ClassLabels, Prediction};
pub use network::network::Network;
pub use network::spec::{LayerSpec, NetworkSpec};
pub use optim::sgd::{OptimizerSpec, UpdateRule};
pub use train::{EpochStats, TrainConfig, train_loop};
pub use data::{ImageFolder, ImagePreprocessor, InputType, Preprocessor, SampleSource, VectorPreprocessor, VectorSource};
pub use config::RunConfig;
pub use error::{Error, PreprocessError, Result};

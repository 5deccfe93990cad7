pub mod classes;
pub mod network;
pub mod spec;

pub use classes::{Class, ClassLabels, Prediction};
pub use network::Network;
pub use spec::{NetworkSpec, LayerSpec};

pub mod sgd;

pub use sgd::{LrSchedule, OptimizerSpec, UpdateRule};

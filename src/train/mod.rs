pub mod accuracy;
pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;

pub use accuracy::Accuracy;
pub use epoch_stats::EpochStats;
pub use train_config::TrainConfig;
pub use loop_fn::train_loop;

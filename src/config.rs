use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::preprocess::InputType;
use crate::error::Result;
use crate::network::classes::ClassLabels;
use crate::network::spec::NetworkSpec;
use crate::train::train_config::TrainConfig;

/// Everything a training run needs, loadable from one JSON file.
///
/// Every field is optional in the file. When `network` is absent the default
/// `input → 128 → 64 → 1` sigmoid classifier is built for the input length
/// implied by `input`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub network: Option<NetworkSpec>,
    pub training: TrainConfig,
    pub input: InputType,
    pub labels: ClassLabels,
}

impl RunConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// The configured topology, or the default classifier for `input`.
    pub fn network_spec(&self) -> NetworkSpec {
        self.network.clone()
            .unwrap_or_else(|| NetworkSpec::binary_image_classifier(self.input.len()))
    }
}

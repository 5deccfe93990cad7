//! Trains the binary image classifier on `<data>/training_set` and then
//! classifies every image under `<data>/test_set`.
//!
//! Expected layout:
//! ```text
//! data/
//! ├── training_set/
//! │   ├── cats/
//! │   └── dogs/
//! └── test_set/
//!     ├── cats/
//!     └── dogs/
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};

use ferrite_classify::data::folder::list_files;
use ferrite_classify::{Class, ClassLabels, ImageFolder, ImagePreprocessor, Network, RunConfig, SampleSource};

#[derive(Parser, Debug)]
#[command(author, version, about = "Train a from-scratch binary image classifier")]
struct Args {
    /// Directory holding training_set/ and test_set/
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// JSON run configuration (topology, training, input size, labels)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of training epochs
    #[arg(long)]
    epochs: Option<usize>,

    /// Seed for weight initialization and shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Extra images to classify after training
    #[arg(long = "image")]
    images: Vec<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: Level,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_target(false)
        .init();

    let mut run = match &args.config {
        Some(path) => RunConfig::load_json(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RunConfig::default(),
    };
    if let Some(epochs) = args.epochs {
        run.training.epochs = epochs;
    }
    let mut spec = run.network_spec();
    if args.seed.is_some() {
        spec.seed = args.seed;
    }

    let train_path = args.data.join("training_set");
    let test_path = args.data.join("test_set");
    if !args.data.is_dir() {
        bail!(
            "data directory not found at {}; expected training_set/ and test_set/ \
             each containing {}/ and {}/",
            args.data.display(),
            run.labels.negative_dir,
            run.labels.positive_dir
        );
    }

    let source = ImageFolder::open(&train_path, &run.labels)
        .with_context(|| format!("opening training data at {}", train_path.display()))?;
    let preprocessor = ImagePreprocessor::new(run.input);
    let mut network = Network::new(&spec)?;

    info!(
        data = %source.root().display(),
        samples = source.len(),
        negatives = source.count(Class::Negative),
        positives = source.count(Class::Positive),
        epochs = run.training.epochs,
        "training the network"
    );
    let history = network.train(&source, &preprocessor, &run.training)?;
    if let Some(last) = history.last() {
        info!(accuracy = %format!("{:.2}%", last.accuracy), "training finished");
    }

    info!(data = %test_path.display(), "testing the network");
    if !test_path.is_dir() {
        bail!("test directory not found at {}", test_path.display());
    }
    let mut test_images = Vec::new();
    for dir in [&run.labels.negative_dir, &run.labels.positive_dir] {
        let class_dir = test_path.join(dir);
        if class_dir.is_dir() {
            let mut files = list_files(&class_dir)?;
            files.sort();
            test_images.extend(files);
        } else {
            warn!(dir = %class_dir.display(), "missing test class directory");
        }
    }
    test_images.extend(args.images.iter().cloned());

    for path in &test_images {
        classify(&mut network, &preprocessor, &run.labels, path);
    }
    Ok(())
}

fn classify(network: &mut Network, preprocessor: &ImagePreprocessor, labels: &ClassLabels, path: &Path) {
    match network.predict(&path.to_path_buf(), preprocessor) {
        Ok(prediction) => println!(
            "Image: {} - Predicted: {} ({:.3})",
            path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
            prediction.label(labels),
            prediction.score
        ),
        Err(e) => warn!(image = %path.display(), error = %e, "could not classify image"),
    }
}

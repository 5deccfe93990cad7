pub mod folder;
pub mod preprocess;
pub mod source;

pub use folder::ImageFolder;
pub use preprocess::{ImagePreprocessor, InputType};
pub use source::{Preprocessor, SampleSource, VectorPreprocessor, VectorSource};

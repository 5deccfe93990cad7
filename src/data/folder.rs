use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::data::source::SampleSource;
use crate::error::{Error, Result};
use crate::network::classes::{Class, ClassLabels};

/// Labeled images laid out as `<root>/<class dir>/<image>`.
///
/// Only the two directories named in `ClassLabels` are read; anything else
/// under the root is ignored. Files are listed once at open time, sorted by
/// path, and decoded lazily by the preprocessor.
#[derive(Debug, Clone)]
pub struct ImageFolder {
    root: PathBuf,
    entries: Vec<(PathBuf, Class)>,
}

impl ImageFolder {
    pub fn open(root: impl AsRef<Path>, labels: &ClassLabels) -> Result<ImageFolder> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::MissingData { path: root });
        }

        let mut entries = Vec::new();
        for (dir_name, class) in [
            (&labels.negative_dir, Class::Negative),
            (&labels.positive_dir, Class::Positive),
        ] {
            let dir = root.join(dir_name);
            if !dir.is_dir() {
                return Err(Error::MissingData { path: dir });
            }
            let mut files = list_files(&dir)?;
            files.sort();
            debug!(dir = %dir.display(), count = files.len(), "found class directory");
            entries.extend(files.into_iter().map(|path| (path, class)));
        }

        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if entry.path().is_dir() && labels.class_for_dir(&name).is_none() {
                warn!(dir = %entry.path().display(), "ignoring unrecognized class directory");
            }
        }

        Ok(ImageFolder { root, entries })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, index: usize) -> &Path {
        &self.entries[index].0
    }

    pub fn count(&self, class: Class) -> usize {
        self.entries.iter().filter(|(_, c)| *c == class).count()
    }
}

/// Regular files directly inside `dir`.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

impl SampleSource for ImageFolder {
    type Raw = PathBuf;

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn label(&self, index: usize) -> Class {
        self.entries[index].1
    }

    fn raw(&self, index: usize) -> Result<PathBuf> {
        Ok(self.entries[index].0.clone())
    }
}

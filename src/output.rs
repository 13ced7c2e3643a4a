use std::{
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, info};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Could not create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not delete {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What happened to an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Skipped,
    Written,
    Deleted,
    /// Nothing to write and no stale file to remove.
    Absent,
}

/// Writes generated files in full or removes them when there is nothing to write.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputController {
    skip: bool,
}

impl OutputController {
    pub fn new(skip: bool) -> Self {
        Self { skip }
    }

    pub fn skips(&self) -> bool {
        self.skip
    }

    pub fn apply(&self, path: &Path, contents: Option<&str>) -> Result<Outcome, OutputError> {
        if self.skip {
            debug!("Skipping {}", path.display());
            return Ok(Outcome::Skipped);
        }
        match contents {
            Some(contents) => {
                write_atomically(path, contents)?;
                info!("Wrote {}", path.display());
                Ok(Outcome::Written)
            }
            None => remove(path),
        }
    }
}

fn remove(path: &Path) -> Result<Outcome, OutputError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!("Deleted {}, no external dependencies left", path.display());
            Ok(Outcome::Deleted)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("{} does not exist, nothing to do", path.display());
            Ok(Outcome::Absent)
        }
        Err(source) => Err(OutputError::Delete {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// The contents land in a temporary file next to `path` that is then renamed
/// over it, so readers see either the old or the new file.
fn write_atomically(path: &Path, contents: &str) -> Result<(), OutputError> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory).map_err(|source| OutputError::CreateDirectory {
        path: directory.to_path_buf(),
        source,
    })?;

    let write_error = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = NamedTempFile::new_in(directory).map_err(write_error)?;
    file.write_all(contents.as_bytes()).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|err| write_error(err.error))?;
    Ok(())
}

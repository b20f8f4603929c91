//! Loading and atomically saving the example store.
//!
//! The store is the only persisted state. It is read in full and, when
//! changed, rewritten in full: the new JSON goes to a temporary file in
//! the same directory, which is then renamed over the canonical path.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;

use super::examples::ExampleStore;

/// Application folder under the user configuration directory.
pub const APP_DIR: &str = "diffgpt";

/// File name of the persisted store.
pub const STORE_FILE: &str = "config.json";

/// `<user config dir>/diffgpt/config.json`
pub fn default_store_path() -> Result<PathBuf, StoreError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(STORE_FILE))
        .ok_or(StoreError::ConfigDirUnavailable)
}

impl ExampleStore {
    /// Read the store at `path`.
    ///
    /// A missing file is an empty store. Anything that is present but not
    /// a valid store is [`StoreError::CorruptState`].
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No example store at {}, starting empty", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::CorruptState {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replace the store at `path` with `self`.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        create_private_dir(dir)?;

        let mut data = serde_json::to_vec_pretty(self).map_err(StoreError::Serialize)?;
        data.push(b'\n');

        let write_err = |source| StoreError::Write {
            dir: dir.to_path_buf(),
            source,
        };

        // NamedTempFile is created with mode 0600 on unix.
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{STORE_FILE}."))
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(write_err)?;
        tmp.write_all(&data).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;

        match tmp.persist(path) {
            Ok(_) => {
                debug!("Saved {} scope(s) to {}", self.len(), path.display());
                Ok(())
            }
            Err(e) => {
                let cleanup = e.file.close().err();
                Err(StoreError::Persist {
                    path: path.to_path_buf(),
                    source: e.error,
                    cleanup,
                })
            }
        }
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::DirBuilderExt;

    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o750)
        .create(dir)
        .map_err(|source| StoreError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> Result<(), StoreError> {
    std::fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

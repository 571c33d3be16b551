//! Opening book persisted as a single JSON document

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{BookError, MemoryBook, OpeningBook, OpeningPosition};
use crate::board::Stone;

#[derive(Serialize, Deserialize)]
struct BookFile {
    positions: Vec<OpeningPosition>,
}

/// A [`MemoryBook`] loaded from and saved to a JSON file.
///
/// Writes stay in memory until [`save`](JsonFileBook::save).
#[derive(Debug)]
pub struct JsonFileBook {
    path: PathBuf,
    inner: MemoryBook,
}

impl JsonFileBook {
    /// Load `path`, or start an empty book if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            log::info!("book {} not found, starting empty", path.display());
            return Ok(Self {
                path,
                inner: MemoryBook::new(),
            });
        }

        let data = fs::read_to_string(&path).map_err(|source| BookError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file: BookFile = serde_json::from_str(&data).map_err(|source| BookError::Json {
            path: path.display().to_string(),
            source,
        })?;
        for position in &file.positions {
            position.validate()?;
        }

        log::info!("loaded {} book positions from {}", file.positions.len(), path.display());
        Ok(Self {
            path,
            inner: file.positions.into_iter().collect(),
        })
    }

    /// Write every position to the file, ordered by hash then side to move.
    pub fn save(&self) -> Result<(), BookError> {
        let file = BookFile {
            positions: self.inner.positions().into_iter().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| BookError::Json {
            path: self.path.display().to_string(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| BookError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        log::debug!("saved {} book positions to {}", file.positions.len(), self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OpeningBook for JsonFileBook {
    fn get(&self, hash: &str, side: Stone) -> Result<Option<OpeningPosition>, BookError> {
        self.inner.get(hash, side)
    }

    fn upsert(&mut self, position: OpeningPosition) -> Result<(), BookError> {
        self.inner.upsert(position)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

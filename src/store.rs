// src/store.rs
//! Append-only CSV dataset and the in-memory [`SeenSet`] derived from it.
//!
//! Layout: header `source,title,link,date,summary`, then one row per item. The file is only
//! ever opened for appending; existing rows are never rewritten.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader};
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::dedup::SeenSet;
use crate::ingest::types::Item;

pub const HEADER: [&str; 5] = ["source", "title", "link", "date", "summary"];

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("opening dataset {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("reading dataset {}: {source}", .path.display())]
    Read { path: PathBuf, source: csv::Error },
    #[error("writing dataset {}: {source}", .path.display())]
    Write { path: PathBuf, source: csv::Error },
    #[error("flushing dataset {}: {source}", .path.display())]
    Flush { path: PathBuf, source: io::Error },
}

// Only the key matters on load. "Link" covers files written with capitalized headers.
#[derive(Debug, Deserialize)]
struct LinkRow {
    #[serde(alias = "Link")]
    link: String,
}

/// Owner of one dataset file and of the links recorded in it.
#[derive(Debug)]
pub struct Persister {
    path: PathBuf,
    seen: SeenSet,
}

impl Persister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seen: SeenSet::new(),
        }
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// (Re)build the seen set from the dataset.
    ///
    /// A missing file is an empty dataset. Malformed rows are logged and skipped; only I/O
    /// failures are errors.
    pub fn load(&mut self) -> Result<&SeenSet, PersistError> {
        self.seen = SeenSet::new();

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no dataset yet");
                return Ok(&self.seen);
            }
            Err(source) => {
                return Err(PersistError::Open {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(BufReader::new(file));

        let mut rows = 0usize;
        let mut skipped = 0usize;
        for (idx, rec) in rdr.deserialize::<LinkRow>().enumerate() {
            rows += 1;
            match rec {
                Ok(row) if !row.link.trim().is_empty() => {
                    self.seen.insert(row.link);
                }
                Ok(_) => {
                    skipped += 1;
                    warn!(path = %self.path.display(), row = idx + 1, "skipping row with empty link");
                }
                Err(e) if e.is_io_error() => {
                    return Err(PersistError::Read {
                        path: self.path.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    skipped += 1;
                    warn!(path = %self.path.display(), row = idx + 1, error = %e, "skipping malformed row");
                }
            }
        }

        info!(
            path = %self.path.display(),
            rows,
            skipped,
            links = self.seen.len(),
            "loaded existing dataset"
        );
        Ok(&self.seen)
    }

    /// Append `items` in order and return how many rows were written.
    ///
    /// Writes nothing (and touches no file) for an empty slice. The header goes out only when
    /// the file is new or empty. Rows are flushed and synced before returning, and the
    /// appended links join the seen set.
    pub fn append(&mut self, items: &[Item]) -> Result<usize, PersistError> {
        if items.is_empty() {
            return Ok(0);
        }

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| PersistError::Open {
                path: self.path.clone(),
                source,
            })?;
        }

        let needs_header = match fs::metadata(&self.path) {
            Ok(m) => m.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| PersistError::Open {
                path: self.path.clone(),
                source,
            })?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        for it in items {
            wtr.serialize(it).map_err(|source| PersistError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        let file = wtr.into_inner().map_err(|e| PersistError::Flush {
            path: self.path.clone(),
            source: io::Error::new(e.error().kind(), e.error().to_string()),
        })?;
        file.sync_all().map_err(|source| PersistError::Flush {
            path: self.path.clone(),
            source,
        })?;

        for it in items {
            self.seen.insert(it.link.clone());
        }
        debug!(path = %self.path.display(), rows = items.len(), header = needs_header, "appended");
        Ok(items.len())
    }
}

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::discretize::State;
use crate::npy::{self, NpyError};

#[derive(Error, Debug)]
pub enum QTableError {
    #[error("q-table i/o on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("q-table file {path} is unreadable: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: NpyError,
    },
    #[error("q-table shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("q-table of shape {shape:?} needs {expected} values, got {found}")]
    Length {
        shape: [usize; 3],
        expected: usize,
        found: usize,
    },
}

/// Dense `aoi_bins × cqi_bins × num_weight_bins` value table in C order.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    shape: [usize; 3],
    values: Vec<f64>,
}

impl QTable {
    /// Zero-initialized table.
    #[must_use]
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self {
            shape,
            values: vec![0.0; shape.iter().product()],
        }
    }

    /// # Errors
    ///
    /// Returns [`QTableError::Length`] when `values` does not fill `shape`.
    pub fn from_vec(shape: [usize; 3], values: Vec<f64>) -> Result<Self, QTableError> {
        let expected = shape.iter().product();
        if values.len() != expected {
            return Err(QTableError::Length {
                shape,
                expected,
                found: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    #[must_use]
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    fn row_start(&self, state: State) -> usize {
        assert!(
            state.aoi_bin < self.shape[0] && state.cqi_bin < self.shape[1],
            "state {state:?} outside q-table of shape {:?}",
            self.shape
        );
        (state.aoi_bin * self.shape[1] + state.cqi_bin) * self.shape[2]
    }

    /// Action values of one state.
    ///
    /// # Panics
    ///
    /// Panics if `state` lies outside the table.
    #[must_use]
    pub fn row(&self, state: State) -> &[f64] {
        let start = self.row_start(state);
        &self.values[start..start + self.shape[2]]
    }

    #[must_use]
    pub fn get(&self, state: State, action: usize) -> f64 {
        self.row(state)[action]
    }

    pub fn set(&mut self, state: State, action: usize, value: f64) {
        let start = self.row_start(state);
        self.values[start..start + self.shape[2]][action] = value;
    }

    /// Index of the best action, the first one on ties.
    #[must_use]
    pub fn best_action(&self, state: State) -> usize {
        let row = self.row(state);
        let mut best = 0;
        for (action, &value) in row.iter().enumerate().skip(1) {
            if value > row[best] {
                best = action;
            }
        }
        best
    }

    #[must_use]
    pub fn max_value(&self, state: State) -> f64 {
        self.row(state)[self.best_action(state)]
    }

    /// Writes the table as a `.npy` array.
    ///
    /// # Errors
    ///
    /// Returns [`QTableError::Io`] if the file cannot be created or written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), QTableError> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| QTableError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
        npy::write_f64(&mut writer, &self.shape, &self.values).map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        info!(path = %path.display(), shape = ?self.shape, "q-table saved");
        Ok(())
    }

    /// Reads a table written by [`QTable::save`], insisting on `shape`.
    ///
    /// The stored shape is compared before any array data is read.
    ///
    /// # Errors
    ///
    /// Returns [`QTableError::ShapeMismatch`] when the stored array does not
    /// have exactly `shape`, and I/O or format errors otherwise.
    pub fn load(path: impl AsRef<Path>, shape: [usize; 3]) -> Result<Self, QTableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| QTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let format_err = |source: NpyError| QTableError::Format {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = BufReader::new(file);
        let found = npy::read_header(&mut reader).map_err(format_err)?;
        if found.as_slice() != shape.as_slice() {
            return Err(QTableError::ShapeMismatch {
                expected: shape.to_vec(),
                found,
            });
        }
        let values = npy::read_values(&mut reader, shape.iter().product()).map_err(format_err)?;
        let table = Self::from_vec(shape, values)?;
        info!(path = %path.display(), shape = ?shape, "q-table loaded");
        Ok(table)
    }
}

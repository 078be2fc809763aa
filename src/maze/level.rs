//! Level files and level sequencing.
//!
//! Levels live in a maps directory as `maze3d-<n>.json`, numbered from 1.
//! [`LevelLibrary`] discovers and loads them; [`LevelSequencer`] tracks which
//! level a session is on and when the run is over.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use super::grid::Grid;

/// Errors loading or validating a level file.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("level file is not a valid cell grid: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level grid has no rows or no columns")]
    EmptyGrid,
    #[error("level grid row {row} has a different length than the first row")]
    RaggedRow { row: usize },
    #[error("no maze3d-<n>.json files found in {dir}")]
    EmptyLibrary { dir: PathBuf },
    #[error("level {level} does not exist (library holds {count})")]
    UnknownLevel { level: usize, count: usize },
}

fn level_file_name(level: usize) -> String {
    format!("maze3d-{level}.json")
}

/// A directory of numbered level files.
#[derive(Debug, Clone)]
pub struct LevelLibrary {
    dir: PathBuf,
    count: usize,
}

impl LevelLibrary {
    /// Scans `dir` for consecutively numbered level files starting at 1.
    ///
    /// # Errors
    /// [`LevelError::EmptyLibrary`] when `maze3d-1.json` is absent.
    pub fn discover(dir: &Path) -> Result<Self, LevelError> {
        let mut count = 0;
        while dir.join(level_file_name(count + 1)).is_file() {
            count += 1;
        }
        if count == 0 {
            return Err(LevelError::EmptyLibrary {
                dir: dir.to_path_buf(),
            });
        }
        info!("level library at {} holds {} level(s)", dir.display(), count);
        Ok(Self {
            dir: dir.to_path_buf(),
            count,
        })
    }

    /// Number of levels available.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Loads and validates one level grid.
    pub fn load(&self, level: usize) -> Result<Grid, LevelError> {
        if level == 0 || level > self.count {
            return Err(LevelError::UnknownLevel {
                level,
                count: self.count,
            });
        }
        let path = self.dir.join(level_file_name(level));
        let bytes = fs::read(&path)?;
        let grid = Grid::from_json_slice(&bytes)?;
        info!(
            "loaded level {} ({}x{} cells) from {}",
            level,
            grid.cols(),
            grid.rows(),
            path.display()
        );
        Ok(grid)
    }
}

/// Tracks progression through the level library.
///
/// `current` is the level being played, `next` the one queued after it.
/// A run is finished once `current` reaches the library count; a mobile run
/// is additionally capped at a single level.
#[derive(Debug, Clone)]
pub struct LevelSequencer {
    current: usize,
    next: usize,
    count: usize,
    is_mobile: bool,
}

impl LevelSequencer {
    pub fn new(start_level: usize, count: usize, is_mobile: bool) -> Self {
        let current = start_level.clamp(1, count.max(1));
        Self {
            current,
            next: current + 1,
            count,
            is_mobile,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn next(&self) -> usize {
        self.next
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the run has no further level to advance to.
    pub fn is_finished(&self) -> bool {
        self.current >= self.count
    }

    /// Whether this is a single-level mobile run.
    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    /// Advances to the queued level and returns its index.
    pub fn get_next(&mut self) -> usize {
        self.current = self.next;
        self.next = self.current + 1;
        self.current
    }
}

//! The maze grid and cell classification.
//!
//! A level file is a JSON 2D array mixing numbers and strings: `1` is open
//! floor, any other number is a wall variant (the value selects a wall
//! texture in the renderer), `"D"` marks the spawn cell and `"A"` the exit.
//! [`Grid`] validates the shape once at load time and is immutable for the
//! lifetime of a level.

use serde::Deserialize;

use super::level::LevelError;

/// Numeric code for open floor.
pub const OPEN_CODE: f64 = 1.0;
/// Marker string for the spawn cell.
pub const START_MARKER: &str = "D";
/// Marker string for the exit cell.
pub const EXIT_MARKER: &str = "A";

/// Raw cell value as it appears in a level file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellCode {
    /// Numeric code: `1` is open floor, anything else is a wall variant.
    Code(f64),
    /// String marker: `"D"` spawn, `"A"` exit, anything else open floor.
    Marker(String),
}

/// What a cell means for navigation and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    Open,
    Wall,
    Start,
    Exit,
}

/// Classifies a raw cell code. Pure and total: every code maps to exactly
/// one class, and repeated calls agree.
///
/// A cell is a wall iff its code is numeric and not the open sentinel.
/// Unrecognized marker strings are passable floor, matching how the level
/// format has always treated them.
pub fn classify(code: &CellCode) -> CellClass {
    match code {
        CellCode::Code(value) if *value == OPEN_CODE => CellClass::Open,
        CellCode::Code(value) if value.is_finite() => CellClass::Wall,
        CellCode::Code(_) => CellClass::Open,
        CellCode::Marker(marker) if marker == START_MARKER => CellClass::Start,
        CellCode::Marker(marker) if marker == EXIT_MARKER => CellClass::Exit,
        CellCode::Marker(_) => CellClass::Open,
    }
}

/// An immutable, rectangular maze grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Vec<Vec<CellCode>>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Validates row shape and builds a grid.
    ///
    /// # Errors
    /// [`LevelError::EmptyGrid`] when there are no rows or no columns;
    /// [`LevelError::RaggedRow`] when any row's length differs from the
    /// first row's.
    pub fn new(cells: Vec<Vec<CellCode>>) -> Result<Self, LevelError> {
        let rows = cells.len();
        let cols = cells.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(LevelError::EmptyGrid);
        }
        if let Some(row) = cells.iter().position(|r| r.len() != cols) {
            return Err(LevelError::RaggedRow { row });
        }
        Ok(Self { cells, rows, cols })
    }

    /// Parses a level file's JSON body.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, LevelError> {
        let cells: Vec<Vec<CellCode>> = serde_json::from_slice(bytes)?;
        Self::new(cells)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The cell at `(row, col)`, or `None` outside the grid. Callers clamp
    /// indices before lookup; a clamped index equal to the dimension lands
    /// here as `None`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellCode> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    /// Classification of the cell at `(row, col)`, `None` outside the grid.
    pub fn class_at(&self, row: usize, col: usize) -> Option<CellClass> {
        self.cell(row, col).map(classify)
    }

    /// Whether `(row, col)` blocks movement and sight. Out-of-bounds
    /// indices count as walls.
    pub fn is_wall(&self, row: usize, col: usize) -> bool {
        match self.class_at(row, col) {
            Some(CellClass::Wall) | None => true,
            Some(_) => false,
        }
    }

    /// First cell (row-major) with the given class.
    pub fn find(&self, class: CellClass) -> Option<(usize, usize)> {
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, code) in cells.iter().enumerate() {
                if classify(code) == class {
                    return Some((row, col));
                }
            }
        }
        None
    }
}

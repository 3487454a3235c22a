//! Course descriptions: the static tile layout and obstacle spawn points.
//!
//! A course is a line-oriented grid. Each character is one tile:
//!
//! ```text
//! #  solid earth
//! 0  narrow obstacle spawn point
//! 1  wide obstacle spawn point
//!    anything else is empty
//! ```
//!
//! Every row must have the same length.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Course bundled with the crate.
pub const DEFAULT_COURSE: &str = include_str!("../../courses/default.txt");

/// Width class of an obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Narrow,
    Wide,
}

/// A single cell of a course description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseCell {
    Empty,
    Solid,
    Obstacle(ObstacleKind),
}

impl CourseCell {
    fn from_char(c: char) -> Self {
        match c {
            '#' => CourseCell::Solid,
            '0' => CourseCell::Obstacle(ObstacleKind::Narrow),
            '1' => CourseCell::Obstacle(ObstacleKind::Wide),
            _ => CourseCell::Empty,
        }
    }
}

/// Parsed, rectangular course description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    width: usize,
    height: usize,
    /// Row-major cells.
    cells: Vec<CourseCell>,
}

impl Course {
    /// Parse a course from its text form.
    pub fn parse(text: &str) -> Result<Self, CourseError> {
        let lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();

        let width = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(CourseError::Empty);
        }

        let mut cells = Vec::with_capacity(width * lines.len());
        for (i, line) in lines.iter().enumerate() {
            let len = line.chars().count();
            if len != width {
                return Err(CourseError::Ragged {
                    line: i + 1,
                    expected: width,
                    found: len,
                });
            }
            cells.extend(line.chars().map(CourseCell::from_char));
        }

        Ok(Self {
            width,
            height: lines.len(),
            cells,
        })
    }

    /// Read and parse a course file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CourseError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Width in tiles.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at (column, row), `None` outside the grid.
    pub fn cell(&self, column: usize, row: usize) -> Option<CourseCell> {
        if column >= self.width || row >= self.height {
            return None;
        }
        Some(self.cells[row * self.width + column])
    }

    /// Obstacle spawn points as (column, row, kind), in row-major order.
    pub fn obstacle_spawns(&self) -> impl Iterator<Item = (usize, usize, ObstacleKind)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| match cell {
                CourseCell::Obstacle(kind) => Some((i % self.width, i / self.width, *kind)),
                _ => None,
            })
    }
}

impl Default for Course {
    fn default() -> Self {
        match Self::parse(DEFAULT_COURSE) {
            Ok(course) => course,
            Err(e) => unreachable!("bundled course is malformed: {e}"),
        }
    }
}

/// Course loading errors.
#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    #[error("Course description is empty")]
    Empty,
    #[error("Course row {line} has {found} tiles, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Failed to read course: {0}")]
    Io(#[from] io::Error),
}

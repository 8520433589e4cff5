use std::fmt;

use crate::geom::Point;

/// Errors from building or editing a [`SideScrollGrid`](crate::SideScrollGrid).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The position lies outside the grid.
    OutOfBounds { pos: Point },
    /// Map lines have different widths; `line` is the first offending one.
    InconsistentSize { line: usize },
    /// A map character that is neither `#`, `.` nor a digit.
    InvalidRune { ch: char, pos: Point },
    /// The map has no cells.
    Empty,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { pos } => write!(f, "grid: position {pos} out of bounds"),
            Self::InconsistentSize { line } => {
                write!(f, "grid: map line {line} has an inconsistent width")
            }
            Self::InvalidRune { ch, pos } => {
                write!(f, "grid: map contains invalid rune \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::Empty => write!(f, "grid: empty map"),
        }
    }
}

impl std::error::Error for GridError {}

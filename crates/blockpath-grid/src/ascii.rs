//! Text maps: one character per cell, one line per row.
//!
//! `#` is a blocked cell, `.` an open cell of height 0, and a digit an open
//! cell of that height. Heights above 9 render as `+`.

use crate::error::GridError;
use crate::geom::Point;
use crate::grid::{BLOCKED, GridConfig, SideScrollGrid};

const PATH_RUNE: char = '*';

fn height_rune(height: i32) -> char {
    match height {
        h if h < 0 => '#',
        0 => '.',
        h => char::from_digit(h as u32, 10).unwrap_or('+'),
    }
}

impl SideScrollGrid {
    /// Parse a text map with the default config.
    ///
    /// Leading and trailing whitespace of the whole map is trimmed, but not of
    /// individual lines. Every line must have the same width.
    pub fn from_ascii(map: &str) -> Result<Self, GridError> {
        Self::from_ascii_with_config(map, GridConfig::default())
    }

    pub fn from_ascii_with_config(map: &str, config: GridConfig) -> Result<Self, GridError> {
        let map = map.trim();
        if map.is_empty() {
            return Err(GridError::Empty);
        }

        let mut width = None;
        let mut heights = Vec::new();
        let mut rows = 0;
        for (y, line) in map.lines().enumerate() {
            let mut w = 0;
            for (x, ch) in line.chars().enumerate() {
                let height = match ch {
                    '#' => BLOCKED,
                    '.' => 0,
                    _ => match ch.to_digit(10) {
                        Some(d) => d as i32,
                        None => {
                            return Err(GridError::InvalidRune {
                                ch,
                                pos: Point::new(x as i32, y as i32),
                            });
                        }
                    },
                };
                heights.push(height);
                w += 1;
            }
            if *width.get_or_insert(w) != w {
                return Err(GridError::InconsistentSize { line: y });
            }
            rows += 1;
        }

        let width = width.unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }
        log::debug!("parsed {width}x{rows} map");
        Ok(Self::from_heights(width, rows, heights, config))
    }

    /// The map as text, in the format read by [`from_ascii`](Self::from_ascii).
    pub fn to_ascii(&self) -> String {
        self.render_path(&[])
    }

    /// The map as text with every point of `path` drawn as `*`.
    ///
    /// Points outside the grid are ignored.
    pub fn render_path(&self, path: &[Point]) -> String {
        let width = self.width() as usize;
        let mut rows: Vec<Vec<char>> = (0..self.height_count())
            .map(|y| {
                (0..self.width())
                    .map(|x| height_rune(self.height(Point::new(x, y))))
                    .collect()
            })
            .collect();
        for &p in path {
            if self.contains(p) {
                rows[p.y as usize][p.x as usize] = PATH_RUNE;
            }
        }

        let mut out = String::with_capacity((width + 1) * rows.len());
        for row in rows {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

//! Side-scrolling height grid exposed as a [`Graph`].
//!
//! Every cell stores a height. Cells at [`BLOCKED`] (or any negative height)
//! cannot be entered, and anything outside the grid reads as blocked. Steps
//! between open cells cost 1 regardless of height.

use blockpath_solver::{Graph, StateCost};

use crate::error::GridError;
use crate::geom::{Point, euclidean, manhattan};

/// Height of an impassable cell.
pub const BLOCKED: i32 = -1;

/// Cost of a cardinal step.
const STEP_COST: f32 = 1.0;
/// Cost of a diagonal step, when enabled.
const DIAGONAL_COST: f32 = 2.0;

/// Search state of a [`SideScrollGrid`]: the row-major cell index
/// `x + y * width`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId(pub usize);

impl CellId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Lower bound used to guide the search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    #[default]
    Manhattan,
    Euclidean,
}

/// How a [`SideScrollGrid`] connects its cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    pub heuristic: Heuristic,
    /// Allow diagonal steps. They cost 2 and need both orthogonal cells to
    /// be open, so paths never cut corners.
    pub diagonals: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SideScrollGrid {
    width: i32,
    height: i32,
    heights: Vec<i32>,
    config: GridConfig,
}

impl SideScrollGrid {
    /// An all-open grid (every height 0) with the default config.
    ///
    /// # Panics
    ///
    /// If a dimension is negative.
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_config(width, height, GridConfig::default())
    }

    pub fn with_config(width: i32, height: i32, config: GridConfig) -> Self {
        assert!(width >= 0 && height >= 0, "negative grid size {width}x{height}");
        Self {
            width,
            height,
            heights: vec![0; (width * height) as usize],
            config,
        }
    }

    /// Row-major heights, `heights.len() == width * height`.
    pub(crate) fn from_heights(
        width: i32,
        height: i32,
        heights: Vec<i32>,
        config: GridConfig,
    ) -> Self {
        debug_assert_eq!(heights.len(), (width * height) as usize);
        Self {
            width,
            height,
            heights,
            config,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows. (`height` is the height of a cell.)
    #[inline]
    pub fn height_count(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GridConfig) {
        self.config = config;
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    /// State of the cell at `p`, or `None` outside the grid.
    #[inline]
    pub fn cell_id(&self, p: Point) -> Option<CellId> {
        self.contains(p).then(|| CellId((p.x + p.y * self.width) as usize))
    }

    /// Position of a cell. Every cell of a zero-width grid maps to the
    /// origin, which such a grid does not contain.
    #[inline]
    pub fn point(&self, id: CellId) -> Point {
        if self.width == 0 {
            return Point::ZERO;
        }
        let i = id.0 as i32;
        Point::new(i % self.width, i / self.width)
    }

    /// Height at `p`; [`BLOCKED`] outside the grid.
    #[inline]
    pub fn height(&self, p: Point) -> i32 {
        self.cell_id(p).map_or(BLOCKED, |id| self.heights[id.0])
    }

    /// Whether `p` is inside the grid and can be entered.
    #[inline]
    pub fn is_open(&self, p: Point) -> bool {
        self.height(p) >= 0
    }

    pub fn set_height(&mut self, p: Point, height: i32) -> Result<(), GridError> {
        let id = self.cell_id(p).ok_or(GridError::OutOfBounds { pos: p })?;
        self.heights[id.0] = height;
        Ok(())
    }

    /// Iterate over every position, row by row.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Point::new(x, y)))
    }

    fn push_open(&self, p: Point, cost: f32, adjacent: &mut Vec<StateCost<CellId>>) {
        if self.is_open(p) {
            if let Some(id) = self.cell_id(p) {
                adjacent.push(StateCost::new(id, cost));
            }
        }
    }
}

impl Graph for SideScrollGrid {
    type State = CellId;

    fn least_cost_estimate(&self, from: CellId, to: CellId) -> f32 {
        let (a, b) = (self.point(from), self.point(to));
        match self.config.heuristic {
            Heuristic::Manhattan => manhattan(a, b) as f32,
            Heuristic::Euclidean => euclidean(a, b),
        }
    }

    fn adjacent_cost(&self, state: CellId, adjacent: &mut Vec<StateCost<CellId>>) {
        let p = self.point(state);
        if !self.is_open(p) {
            return;
        }
        for q in p.neighbors_4() {
            self.push_open(q, STEP_COST, adjacent);
        }
        if self.config.diagonals {
            for q in p.diagonals() {
                let d = q - p;
                if self.is_open(p.shift(d.x, 0)) && self.is_open(p.shift(0, d.y)) {
                    self.push_open(q, DIAGONAL_COST, adjacent);
                }
            }
        }
    }

    fn describe_state(&self, state: CellId) -> String {
        self.point(state).to_string()
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let cfg: GridConfig = serde_json::from_str(r#"{"diagonals": true}"#).unwrap();
        assert_eq!(cfg.heuristic, Heuristic::Manhattan);
        assert!(cfg.diagonals);
    }
}

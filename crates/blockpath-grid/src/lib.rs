//! Height-grid world for [`blockpath_solver`].
//!
//! [`SideScrollGrid`] is a rectangular map of cell heights that implements
//! [`Graph`](blockpath_solver::Graph), so a
//! [`Pather`](blockpath_solver::Pather) can search it directly.
//! [`Navigator`] wraps both and speaks in [`Point`]s.
//!
//! ```
//! use blockpath_grid::{Navigator, Point, SideScrollGrid};
//!
//! let grid = SideScrollGrid::from_ascii("
//! ...
//! #.#
//! ...
//! ").unwrap();
//! let mut nav = Navigator::new(grid).unwrap();
//! let path = nav.find_path(Point::new(0, 0), Point::new(0, 2)).unwrap();
//! assert!(path.contains(&Point::new(1, 1)));
//! ```

mod ascii;
mod error;
mod geom;
mod grid;
mod navigator;

pub use error::GridError;
pub use geom::{Point, euclidean, manhattan};
pub use grid::{BLOCKED, CellId, GridConfig, Heuristic, SideScrollGrid};
pub use navigator::{Navigator, NavigatorConfig, Route};

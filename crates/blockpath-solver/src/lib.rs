//! Reusable A* path solver for arbitrary state graphs.
//!
//! A [`Pather`] searches any [`Graph`]: the graph names its states, estimates
//! the cost between two of them and lists the neighbours of a state. The
//! solver keeps its search nodes in a pooled allocator that survives between
//! queries, remembers every adjacency list it asked for, and optionally
//! memoises solved paths (and failures) so repeated queries are nearly free.
//!
//! ```
//! use blockpath_solver::{Graph, Pather, Solution, StateCost};
//!
//! /// States 0..10 on a line.
//! struct Line;
//!
//! impl Graph for Line {
//!     type State = u32;
//!
//!     fn least_cost_estimate(&self, from: u32, to: u32) -> f32 {
//!         from.abs_diff(to) as f32
//!     }
//!
//!     fn adjacent_cost(&self, state: u32, adjacent: &mut Vec<StateCost<u32>>) {
//!         if state > 0 {
//!             adjacent.push(StateCost::new(state - 1, 1.0));
//!         }
//!         if state < 9 {
//!             adjacent.push(StateCost::new(state + 1, 1.0));
//!         }
//!     }
//! }
//!
//! let mut pather = Pather::new(Line);
//! let Solution::Solved { path, cost } = pather.solve(2, 5) else {
//!     panic!("no path");
//! };
//! assert_eq!(path, vec![2, 3, 4, 5]);
//! assert_eq!(cost, 3.0);
//! ```
//!
//! The pather assumes the graph is static between searches. After any change
//! to costs or connections, call [`Pather::reset`] (or mutate the graph
//! through [`Pather::update_graph`]).

mod cache;
mod closed;
mod config;
mod graph;
mod node;
mod open;
mod pool;
mod solver;

pub use config::{ConfigError, PatherConfig};
pub use graph::{Graph, INFINITE_COST, State, StateCost};
pub use solver::{CacheData, Pather, PoolData, Solution};

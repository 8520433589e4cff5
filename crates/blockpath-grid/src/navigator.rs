//! Point-level pathfinding over a [`SideScrollGrid`].

use blockpath_solver::{CacheData, ConfigError, Pather, PatherConfig, Solution};

use crate::error::GridError;
use crate::geom::Point;
use crate::grid::{GridConfig, SideScrollGrid};

/// Settings for a [`Navigator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavigatorConfig {
    pub grid: GridConfig,
    pub pather: PatherConfig,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            // Worlds are edited often; cached paths would rarely survive.
            pather: PatherConfig {
                nodes_per_block: 250,
                typical_adjacent: 6,
                use_cache: false,
                cache_capacity: None,
            },
        }
    }
}

/// A path between two points and its cost.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub points: Vec<Point>,
    pub cost: f32,
}

/// Finds paths between points of a grid that can change over time.
pub struct Navigator {
    pather: Pather<SideScrollGrid>,
}

impl Navigator {
    /// A navigator with [`NavigatorConfig::default`] solver settings. The
    /// grid keeps its own config.
    pub fn new(grid: SideScrollGrid) -> Result<Self, ConfigError> {
        let pather = Pather::with_config(grid, NavigatorConfig::default().pather)?;
        Ok(Self { pather })
    }

    /// A navigator whose grid is reconfigured with `config.grid`.
    pub fn with_config(
        mut grid: SideScrollGrid,
        config: NavigatorConfig,
    ) -> Result<Self, ConfigError> {
        grid.set_config(config.grid);
        let pather = Pather::with_config(grid, config.pather)?;
        Ok(Self { pather })
    }

    #[inline]
    pub fn grid(&self) -> &SideScrollGrid {
        self.pather.graph()
    }

    /// Whether `p` can be stood on.
    #[inline]
    pub fn is_valid_location(&self, p: Point) -> bool {
        self.grid().is_open(p)
    }

    /// Change a cell height. Forgets everything the solver learned.
    pub fn set_height(&mut self, p: Point, height: i32) -> Result<(), GridError> {
        self.pather.update_graph(|grid| grid.set_height(p, height))
    }

    /// Cheapest path from `start` to `goal`, both included.
    pub fn find_path(&mut self, start: Point, goal: Point) -> Option<Vec<Point>> {
        self.route(start, goal).map(|r| r.points)
    }

    /// Like [`find_path`](Self::find_path), with the path cost.
    ///
    /// `None` if either end is not a valid location or no path exists. A path
    /// from a point to itself is that single point, at cost 0.
    pub fn route(&mut self, start: Point, goal: Point) -> Option<Route> {
        if !self.is_valid_location(start) || !self.is_valid_location(goal) {
            log::debug!("route {start} -> {goal}: invalid endpoint");
            return None;
        }
        let grid = self.pather.graph();
        let from = grid.cell_id(start)?;
        let to = grid.cell_id(goal)?;

        match self.pather.solve(from, to) {
            Solution::StartEndSame => Some(Route {
                points: vec![start],
                cost: 0.0,
            }),
            Solution::Solved { path, cost } => {
                let grid = self.pather.graph();
                Some(Route {
                    points: path.into_iter().map(|id| grid.point(id)).collect(),
                    cost,
                })
            }
            Solution::NoSolution => None,
        }
    }

    /// Every location reachable from `p` for at most `max_cost`, cheapest
    /// first, with its cost. Empty if `p` is not a valid location.
    pub fn reachable_within(&mut self, p: Point, max_cost: f32) -> Vec<(Point, f32)> {
        let Some(id) = self.grid().cell_id(p).filter(|_| self.is_valid_location(p)) else {
            return Vec::new();
        };
        let near = self.pather.solve_for_near_states(id, max_cost);
        let grid = self.pather.graph();
        near.into_iter().map(|sc| (grid.point(sc.state), sc.cost)).collect()
    }

    pub fn cache_data(&self) -> CacheData {
        self.pather.cache_data()
    }

    /// Forget all learned adjacency and cached paths.
    pub fn reset(&mut self) {
        self.pather.reset();
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    use super::*;
    use crate::grid::BLOCKED;

    fn nav(map: &str) -> Navigator {
        Navigator::new(SideScrollGrid::from_ascii(map).unwrap()).unwrap()
    }

    fn assert_connected(nav: &Navigator, path: &[Point]) {
        for step in path.windows(2) {
            let d = step[1] - step[0];
            assert_eq!(d.x.abs() + d.y.abs(), 1, "{} -> {}", step[0], step[1]);
            assert!(nav.is_valid_location(step[1]));
        }
    }

    #[test]
    fn open_field() {
        let mut nav = nav("
.....
.....
.....
.....
.....
");
        let route = nav.route(Point::new(0, 0), Point::new(4, 4)).unwrap();
        assert_eq!(route.cost, 8.0);
        assert_eq!(route.points.len(), 9);
        assert_eq!(route.points[0], Point::new(0, 0));
        assert_eq!(route.points[8], Point::new(4, 4));
        assert_connected(&nav, &route.points);
    }

    #[test]
    fn same_point_is_single_point_path() {
        let mut nav = nav("...\n...");
        assert_eq!(
            nav.find_path(Point::new(1, 1), Point::new(1, 1)),
            Some(vec![Point::new(1, 1)])
        );
    }

    #[test]
    fn invalid_endpoints() {
        let mut nav = nav("..#\n...");
        assert!(!nav.is_valid_location(Point::new(2, 0)));
        assert!(!nav.is_valid_location(Point::new(-1, 0)));
        assert_eq!(nav.find_path(Point::new(0, 0), Point::new(2, 0)), None);
        assert_eq!(nav.find_path(Point::new(5, 5), Point::new(0, 0)), None);
        assert!(nav.reachable_within(Point::new(2, 0), 10.0).is_empty());
    }

    #[test]
    fn height_does_not_change_cost() {
        let mut nav = nav("0159.");
        let route = nav.route(Point::new(0, 0), Point::new(4, 0)).unwrap();
        assert_eq!(route.cost, 4.0);
    }

    #[test]
    fn walls_force_detour_and_edits_take_effect() {
        let mut nav = nav("
.....
.....
##.##
.....
.....
");
        let (start, goal) = (Point::new(0, 0), Point::new(0, 4));
        let path = nav.find_path(start, goal).unwrap();
        assert!(path.contains(&Point::new(2, 2)));
        assert_eq!(path.len(), 9);

        nav.set_height(Point::new(2, 2), BLOCKED).unwrap();
        assert_eq!(nav.find_path(start, goal), None);

        nav.set_height(Point::new(0, 2), 0).unwrap();
        let path = nav.find_path(start, goal).unwrap();
        assert_eq!(path.len(), 5);
        assert_connected(&nav, &path);

        assert!(nav.set_height(Point::new(9, 9), 0).is_err());
    }

    #[test]
    fn reachable_within_budget() {
        let mut nav = nav("
.#...
.#...
.....
");
        let near = nav.reachable_within(Point::new(0, 0), 2.0);
        let points: Vec<_> = near.iter().map(|&(p, _)| p).collect();
        assert_eq!(points, vec![Point::new(0, 0), Point::new(0, 1), Point::new(0, 2)]);
        assert_eq!(near[2].1, 2.0);
    }

    #[test]
    fn diagonal_config() {
        let grid = SideScrollGrid::from_ascii("...\n...\n...").unwrap();
        let config = NavigatorConfig {
            grid: GridConfig {
                diagonals: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut nav = Navigator::with_config(grid, config).unwrap();
        assert!(nav.grid().config().diagonals);
        // A diagonal step costs as much as two cardinal ones.
        let route = nav.route(Point::new(0, 0), Point::new(2, 2)).unwrap();
        assert_eq!(route.cost, 4.0);
    }

    #[test]
    fn default_navigator_does_not_cache_paths() {
        let mut nav = nav("....\n....");
        nav.find_path(Point::new(0, 0), Point::new(3, 1));
        nav.find_path(Point::new(0, 0), Point::new(3, 1));
        assert_eq!(nav.cache_data(), CacheData::default());
    }

    #[test]
    fn cached_navigator_agrees_with_uncached() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut grid = SideScrollGrid::new(16, 10);
        for p in grid.points().collect::<Vec<_>>() {
            if rng.random_range(0..100) < 20 {
                grid.set_height(p, BLOCKED).unwrap();
            }
        }
        let cached_config = NavigatorConfig {
            pather: PatherConfig::default(),
            ..Default::default()
        };
        let mut plain = Navigator::new(grid.clone()).unwrap();
        let mut cached = Navigator::with_config(grid, cached_config).unwrap();

        let queries: Vec<_> = (0..200)
            .map(|_| {
                let a = Point::new(rng.random_range(0..16), rng.random_range(0..10));
                let b = Point::new(rng.random_range(0..16), rng.random_range(0..10));
                (a, b)
            })
            .collect();

        // Second pass replays queries the cache has seen.
        for &(a, b) in queries.iter().chain(&queries) {
            let x = plain.route(a, b);
            let y = cached.route(a, b);
            assert_eq!(x.as_ref().map(|r| r.cost), y.as_ref().map(|r| r.cost));
            if let Some(route) = y {
                assert_eq!(route.points.first(), Some(&a));
                assert_eq!(route.points.last(), Some(&b));
                assert_connected(&cached, &route.points);
            }
        }
        assert!(cached.cache_data().hits > 0);
    }
}

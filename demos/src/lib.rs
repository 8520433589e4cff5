//! Shared code for the blockpath demo binaries.

use std::fmt::{self, Write as _};
use std::path::PathBuf;

use blockpath_grid::{GridError, Navigator, NavigatorConfig, Point, SideScrollGrid};
use blockpath_solver::{ConfigError, PatherConfig};

pub const USAGE: &str = "usage: route <map-file> <start-x> <start-y> <goal-x> <goal-y>";

/// Command line of the `route` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteArgs {
    pub map: PathBuf,
    pub start: Point,
    pub goal: Point,
}

impl RouteArgs {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, DemoError> {
        let args: Vec<String> = args.into_iter().collect();
        let [map, sx, sy, gx, gy] = args.as_slice() else {
            return Err(DemoError::Usage);
        };
        Ok(Self {
            map: PathBuf::from(map),
            start: Point::new(coord(sx)?, coord(sy)?),
            goal: Point::new(coord(gx)?, coord(gy)?),
        })
    }
}

fn coord(s: &str) -> Result<i32, DemoError> {
    s.parse().map_err(|_| DemoError::BadCoordinate(s.to_string()))
}

#[derive(Debug)]
pub enum DemoError {
    Usage,
    BadCoordinate(String),
    Io(PathBuf, std::io::Error),
    Grid(GridError),
    Config(ConfigError),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage => write!(f, "{USAGE}"),
            Self::BadCoordinate(s) => write!(f, "invalid coordinate {s:?}"),
            Self::Io(path, e) => write!(f, "{}: {e}", path.display()),
            Self::Grid(e) => write!(f, "{e}"),
            Self::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(_, e) => Some(e),
            Self::Grid(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for DemoError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<ConfigError> for DemoError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Load the map and route across it.
pub fn run(args: &RouteArgs) -> Result<String, DemoError> {
    let text =
        std::fs::read_to_string(&args.map).map_err(|e| DemoError::Io(args.map.clone(), e))?;
    route_report(&text, args.start, args.goal)
}

/// The map with the route drawn on it, followed by the cost and the path
/// cache statistics.
pub fn route_report(map: &str, start: Point, goal: Point) -> Result<String, DemoError> {
    let grid = SideScrollGrid::from_ascii(map)?;
    for p in [start, goal] {
        if !grid.contains(p) {
            return Err(GridError::OutOfBounds { pos: p }.into());
        }
    }
    let config = NavigatorConfig {
        pather: PatherConfig::default(),
        ..Default::default()
    };
    let mut nav = Navigator::with_config(grid, config)?;

    let mut out = String::new();
    match nav.route(start, goal) {
        Some(route) => {
            out.push_str(&nav.grid().render_path(&route.points));
            let _ = writeln!(out, "cost: {}", route.cost);
        }
        None => {
            out.push_str(&nav.grid().to_ascii());
            let _ = writeln!(out, "no path from {start} to {goal}");
        }
    }

    let data = nav.cache_data();
    let _ = writeln!(
        out,
        "cache: {} hits, {} misses, {}/{} bytes",
        data.hits, data.misses, data.bytes_used, data.bytes_allocated
    );
    Ok(out)
}

//! Find a route across a text map.
//!
//! Run: cargo run --bin route -- demos/maps/cave.txt 0 0 19 9

use blockpath_demos::{RouteArgs, run};

fn main() {
    let result = RouteArgs::parse(std::env::args().skip(1)).and_then(|args| run(&args));
    match result {
        Ok(report) => print!("{report}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

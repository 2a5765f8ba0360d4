//! **perfect_mazes** generates perfect mazes (every cell reachable by exactly one route) on
//! rectangular grids and finds routes through them.
//!
//! ```ignore
//! let grid = generators::new_maze(Width(30), Height(20), GeneratorAlgorithm::Wilson, 42)?;
//! let solution = SolverAlgorithm::AStar.solve_markers(&grid)?;
//! ```

pub mod cells;
pub mod config;
pub mod disjoint_set;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_iterators;
pub mod pathing;
pub mod random;
pub mod units;
pub mod validation;
mod utils;

pub use crate::cells::{CompassPrimary, GridCoordinate, WallMask};
pub use crate::errors::{Error, ErrorKind, Result};
pub use crate::generators::GeneratorAlgorithm;
pub use crate::grid::Grid;
pub use crate::pathing::{Solution, SolverAlgorithm};
pub use crate::units::{Height, Width};

//! Settings for producing and solving a maze, loadable from any serde format.
//! Every field is optional, missing ones take their default.

use log::info;
use serde_derive::Deserialize;

use crate::errors::*;
use crate::generators::{self, GeneratorAlgorithm};
use crate::grid::Grid;
use crate::pathing::{Solution, SolverAlgorithm};
use crate::random;
use crate::units::{Height, Width};

pub const DEFAULT_WIDTH: usize = 20;
pub const DEFAULT_HEIGHT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub generation: GenerationConfig,
    pub solving: SolvingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub algorithm: GeneratorAlgorithm,
    pub width: usize,
    pub height: usize,
    /// Fixed seed for a reproducible maze, a fresh random one each time if unset.
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            algorithm: GeneratorAlgorithm::RecursiveBacktracker,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: None,
        }
    }
}

impl GenerationConfig {
    pub fn seed_or_random(&self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => {
                let seed = random::random_seed();
                info!("no maze seed configured, using {}", seed);
                seed
            }
        }
    }

    pub fn build_maze(&self) -> Result<Grid> {
        let seed = self.seed_or_random();
        info!("generating {}x{} maze with {}, seed {}",
              self.width, self.height, self.algorithm, seed);
        generators::new_maze(Width(self.width), Height(self.height), self.algorithm, seed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SolvingConfig {
    pub algorithm: SolverAlgorithm,
}

impl Default for SolvingConfig {
    fn default() -> Self {
        SolvingConfig { algorithm: SolverAlgorithm::AStar }
    }
}

impl SolvingConfig {
    /// Solve from the grid's start marker to its end marker.
    pub fn solve(&self, grid: &Grid) -> Result<Solution> {
        self.algorithm.solve_markers(grid)
    }
}

impl MazeConfig {
    /// Generate the configured maze and solve it.
    pub fn run(&self) -> Result<(Grid, Solution)> {
        let grid = self.generation.build_maze()?;
        let solution = self.solving.solve(&grid)?;
        Ok((grid, solution))
    }
}

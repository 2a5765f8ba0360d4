//! Perfect maze generators.
//!
//! Every generator carves a spanning tree into a fully walled grid: afterwards there is exactly
//! one route between any two cells, `cells - 1` walls have been removed and there are no loops.
//! Each one takes the random source explicitly so a seed reproduces the same maze.
//!
//! The algorithms differ in the texture of the maze they produce:
//! - the recursive backtracker makes long winding corridors with few branches,
//! - Kruskal and Prim make lots of short dead ends,
//! - Wilson samples uniformly from all possible spanning trees, so it has no bias at all.

use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use error_chain::bail;
use log::{debug, trace, warn};
use rand::seq::SliceRandom;
use serde_derive::Deserialize;

use crate::cells::{CompassPrimary, DirectedNeighbours, GridCoordinate};
use crate::disjoint_set::DisjointSet;
use crate::errors::*;
use crate::grid::Grid;
use crate::random::{self, MazeRng};
use crate::units::{self, Height, Width};
use crate::utils::{self, FnvHashMap};

/// Wilson's random walks may take at most this many steps per grid cell before generation is
/// abandoned with `GenerationStalled`.
pub const WILSON_STEPS_PER_CELL: usize = 1_000;
const WILSON_MIN_STEP_LIMIT: usize = 100_000;

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorAlgorithm {
    #[serde(rename = "dfs", alias = "recursive-backtracker")]
    RecursiveBacktracker,
    Kruskal,
    Prim,
    Wilson,
}

impl GeneratorAlgorithm {
    pub const ALL: [GeneratorAlgorithm; 4] = [GeneratorAlgorithm::RecursiveBacktracker,
                                              GeneratorAlgorithm::Kruskal,
                                              GeneratorAlgorithm::Prim,
                                              GeneratorAlgorithm::Wilson];

    pub fn name(self) -> &'static str {
        match self {
            GeneratorAlgorithm::RecursiveBacktracker => "dfs",
            GeneratorAlgorithm::Kruskal => "kruskal",
            GeneratorAlgorithm::Prim => "prim",
            GeneratorAlgorithm::Wilson => "wilson",
        }
    }

    /// Carve a perfect maze into `grid`, which must not have had any wall removed yet.
    pub fn generate(self, grid: &mut Grid, rng: &mut MazeRng) -> Result<()> {
        debug!("generating {}x{} maze with {}", grid.width(), grid.height(), self);
        match self {
            GeneratorAlgorithm::RecursiveBacktracker => recursive_backtracker(grid, rng),
            GeneratorAlgorithm::Kruskal => kruskal(grid, rng),
            GeneratorAlgorithm::Prim => prim(grid, rng),
            GeneratorAlgorithm::Wilson => wilson(grid, rng),
        }
    }

    pub fn generate_seeded(self, grid: &mut Grid, seed: u64) -> Result<()> {
        let mut rng = random::seeded_rng(seed);
        self.generate(grid, &mut rng)
    }
}

impl fmt::Display for GeneratorAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeneratorAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<GeneratorAlgorithm> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dfs" | "recursive-backtracker" => Ok(GeneratorAlgorithm::RecursiveBacktracker),
            "kruskal" => Ok(GeneratorAlgorithm::Kruskal),
            "prim" => Ok(GeneratorAlgorithm::Prim),
            "wilson" => Ok(GeneratorAlgorithm::Wilson),
            _ => bail!(ErrorKind::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Build a fresh `width * height` grid and carve a maze into it.
pub fn new_maze(width: Width,
                height: Height,
                algorithm: GeneratorAlgorithm,
                seed: u64)
                -> Result<Grid> {
    let mut grid = Grid::new(width, height)?;
    algorithm.generate_seeded(&mut grid, seed)?;
    Ok(grid)
}

/// Apply the recursive backtracker (randomised depth first search) algorithm to a grid.
///
/// Starting at the grid's start marker, keep walking to a random unvisited neighbour, carving
/// as we go. At a dead end back up along the way we came until a cell with unvisited neighbours
/// turns up. The backtracking uses an explicit stack so big grids cannot overflow the call
/// stack.
pub fn recursive_backtracker(grid: &mut Grid, rng: &mut MazeRng) -> Result<()> {
    ensure_pristine(grid)?;

    let start = grid.start();
    let mut visited = BitSet::with_capacity(grid.size());
    visited.insert(cell_index(grid, start));
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {

        let unvisited_neighbours: DirectedNeighbours = grid.neighbours(current)
            .into_iter()
            .filter(|&(_, neighbour)| !visited.contains(cell_index(grid, neighbour)))
            .collect();

        if unvisited_neighbours.is_empty() {
            stack.pop();
        } else {
            let (dir, next) = unvisited_neighbours[random::random_index(rng, unvisited_neighbours.len())];
            grid.remove_wall(current, dir)?;
            visited.insert(cell_index(grid, next));
            stack.push(next);
        }
    }

    finish(grid, GeneratorAlgorithm::RecursiveBacktracker);
    Ok(())
}

/// Apply randomised Kruskal's algorithm to a grid.
///
/// Every internal wall is a candidate edge. Visit them in a random order and knock a wall down
/// only if the cells either side are not yet connected, which the disjoint set answers.
pub fn kruskal(grid: &mut Grid, rng: &mut MazeRng) -> Result<()> {
    ensure_pristine(grid)?;

    let (width, height) = grid.dimensions();
    let mut edges: Vec<(GridCoordinate, CompassPrimary)> =
        Vec::with_capacity(units::internal_walls_count(width, height).0);
    for coord in grid.iter() {
        for &dir in &[CompassPrimary::East, CompassPrimary::South] {
            if grid.neighbour_at_direction(coord, dir).is_some() {
                edges.push((coord, dir));
            }
        }
    }
    edges.shuffle(rng);

    let mut sets = DisjointSet::new(grid.size());
    let passages_needed = grid.nodes_count().spanning_tree_edges().0;
    let mut passages = 0;

    for (coord, dir) in edges {
        // All cells joined up, the rest of the walls would only make loops.
        if passages == passages_needed {
            break;
        }

        let neighbour = grid.neighbour_at_direction(coord, dir)
            .expect("candidate edges only point at cells on the grid");
        if sets.union(cell_index(grid, coord), cell_index(grid, neighbour)) {
            grid.remove_wall(coord, dir)?;
            passages += 1;
        }
    }

    finish(grid, GeneratorAlgorithm::Kruskal);
    Ok(())
}

/// A wall between a cell in the growing tree and a neighbour that was outside it when the
/// wall was found.
#[derive(Debug, Copy, Clone)]
struct FrontierWall {
    inside: GridCoordinate,
    direction: CompassPrimary,
    outside: GridCoordinate,
}

/// Apply randomised Prim's algorithm (a growing tree) to a grid.
///
/// Start the tree at a random cell and keep a frontier of walls between the tree and the rest
/// of the grid. Repeatedly pull a random wall off the frontier; if the cell beyond it is still
/// outside the tree carve through and add that cell's walls to the frontier, otherwise the
/// entry went stale when its cell joined the tree some other way and is dropped.
pub fn prim(grid: &mut Grid, rng: &mut MazeRng) -> Result<()> {
    ensure_pristine(grid)?;

    let mut in_tree = BitSet::with_capacity(grid.size());
    let mut frontier: Vec<FrontierWall> = Vec::new();

    let first_cell = grid.random_cell(rng);
    in_tree.insert(cell_index(grid, first_cell));
    extend_frontier(grid, &in_tree, first_cell, &mut frontier);

    let mut stale = 0;
    while !frontier.is_empty() {
        let wall = frontier.swap_remove(random::random_index(rng, frontier.len()));
        let outside_index = cell_index(grid, wall.outside);

        if in_tree.contains(outside_index) {
            stale += 1;
            continue;
        }

        grid.remove_wall(wall.inside, wall.direction)?;
        in_tree.insert(outside_index);
        extend_frontier(grid, &in_tree, wall.outside, &mut frontier);
    }
    trace!("prim discarded {} stale frontier walls", stale);

    finish(grid, GeneratorAlgorithm::Prim);
    Ok(())
}

fn extend_frontier(grid: &Grid, in_tree: &BitSet, cell: GridCoordinate, frontier: &mut Vec<FrontierWall>) {
    for (direction, neighbour) in grid.neighbours(cell) {
        if !in_tree.contains(cell_index(grid, neighbour)) {
            frontier.push(FrontierWall {
                inside: cell,
                direction,
                outside: neighbour,
            });
        }
    }
}

/// Apply Wilson's algorithm to a grid, with the default step limit.
pub fn wilson(grid: &mut Grid, rng: &mut MazeRng) -> Result<()> {
    let step_limit = grid.size()
        .saturating_mul(WILSON_STEPS_PER_CELL)
        .max(WILSON_MIN_STEP_LIMIT);
    wilson_with_step_limit(grid, rng, step_limit)
}

/// Apply Wilson's algorithm to a grid, giving up with `GenerationStalled` after `step_limit`
/// random walk steps in total.
///
/// One random cell starts off in the maze. Then, from a random cell not in the maze, take a
/// random walk across the grid (ignoring walls) until it bumps into the maze. Whenever the walk
/// crosses its own path the loop just made is erased. The loop erased walk is then carved into
/// the maze. Repeat until every cell is in the maze. The result is a uniform spanning tree: every
/// possible perfect maze on the grid is equally likely.
///
/// A stalled generation leaves the grid partially carved, it should be thrown away.
pub fn wilson_with_step_limit(grid: &mut Grid, rng: &mut MazeRng, step_limit: usize) -> Result<()> {
    ensure_pristine(grid)?;

    let cells_count = grid.size();
    let mut in_maze = BitSet::with_capacity(cells_count);
    let mut outside = OutsideCells::new(cells_count);

    let first_cell = random::random_index(rng, cells_count);
    in_maze.insert(first_cell);
    outside.remove(first_cell);

    // The current walk, and where each cell on it sits in the walk.
    let mut walk: Vec<usize> = Vec::new();
    let mut walk_position: FnvHashMap<usize, usize> =
        utils::fnv_hashmap(utils::side_table_capacity(cells_count));
    let mut steps = 0;
    let mut walks = 0;

    while let Some(walk_start) = outside.pick(rng) {
        walk.clear();
        walk_position.clear();
        walk.push(walk_start);
        walk_position.insert(walk_start, 0);

        let mut current = walk_start;
        while !in_maze.contains(current) {
            if steps >= step_limit {
                warn!("wilson gave up after {} steps on a {}x{} grid, {} cells left outside the maze",
                      steps, grid.width(), grid.height(), outside.len());
                bail!(ErrorKind::GenerationStalled(steps));
            }
            steps += 1;

            let neighbours = grid.neighbours(grid.index_to_coordinate(current));
            let (_, next_coord) = neighbours[random::random_index(rng, neighbours.len())];
            let next = cell_index(grid, next_coord);

            if let Some(&loop_start) = walk_position.get(&next) {
                for erased in walk.drain(loop_start + 1..) {
                    walk_position.remove(&erased);
                }
            } else {
                walk_position.insert(next, walk.len());
                walk.push(next);
            }
            current = next;
        }

        for pair in walk.windows(2) {
            let (from, to) = (grid.index_to_coordinate(pair[0]), grid.index_to_coordinate(pair[1]));
            let dir = from.direction_to(to).expect("consecutive walk cells are adjacent");
            grid.remove_wall(from, dir)?;
        }
        // The last cell of the walk is the one already in the maze.
        for &cell in &walk[..walk.len() - 1] {
            in_maze.insert(cell);
            outside.remove(cell);
        }

        walks += 1;
        trace!("wilson walk {} carved {} cells, {} steps so far", walks, walk.len() - 1, steps);
    }

    debug!("wilson finished after {} walks and {} steps", walks, steps);
    finish(grid, GeneratorAlgorithm::Wilson);
    Ok(())
}

/// Cells not yet in Wilson's maze, supporting uniform random choice and O(1) removal.
struct OutsideCells {
    cells: Vec<usize>,
    positions: Vec<usize>,
}

impl OutsideCells {
    fn new(cells_count: usize) -> OutsideCells {
        OutsideCells {
            cells: (0..cells_count).collect(),
            positions: (0..cells_count).collect(),
        }
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn pick(&self, rng: &mut MazeRng) -> Option<usize> {
        if self.cells.is_empty() {
            None
        } else {
            Some(self.cells[random::random_index(rng, self.cells.len())])
        }
    }

    fn remove(&mut self, cell: usize) {
        let position = self.positions[cell];
        self.cells.swap_remove(position);
        if let Some(&moved) = self.cells.get(position) {
            self.positions[moved] = position;
        }
    }
}

fn ensure_pristine(grid: &Grid) -> Result<()> {
    if !grid.is_pristine() {
        bail!(ErrorKind::AlreadyGenerated);
    }
    Ok(())
}

#[inline]
fn cell_index(grid: &Grid, coord: GridCoordinate) -> usize {
    grid.coordinate_to_index(coord)
        .expect("generators only visit coordinates on the grid")
}

fn finish(grid: &Grid, algorithm: GeneratorAlgorithm) {
    grid.debug_assert_consistent();
    debug_assert_eq!(grid.removed_walls_count(),
                     grid.nodes_count().spanning_tree_edges().0,
                     "{} did not carve a spanning tree", algorithm);
    debug!("{} carved {} passages into a {}x{} grid",
           algorithm, grid.removed_walls_count(), grid.width(), grid.height());
}

#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};

    use super::*;
    use crate::pathing::Distances;
    use crate::random::seeded_rng;
    use crate::validation;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn maze(w: usize, h: usize, algorithm: GeneratorAlgorithm, seed: u64) -> Grid {
        new_maze(Width(w), Height(h), algorithm, seed).expect("maze generation failed")
    }

    fn assert_spanning_tree(grid: &Grid) {
        assert_eq!(grid.removed_walls_count(), grid.size() - 1);
        let distances = Distances::for_grid(grid, GridCoordinate::new(0, 0))
            .expect("origin is on every grid");
        assert_eq!(distances.reachable_count(), grid.size());
        assert!(validation::is_perfect(grid));
    }

    #[test]
    fn every_algorithm_carves_a_spanning_tree() {
        init_logging();
        for algorithm in GeneratorAlgorithm::ALL.iter().cloned() {
            for &(w, h) in &[(1, 1), (2, 1), (1, 7), (5, 5), (12, 7), (30, 30)] {
                for seed in 0..4 {
                    assert_spanning_tree(&maze(w, h, algorithm, seed));
                }
            }
        }
    }

    #[test]
    fn spanning_tree_for_any_size_and_seed() {
        fn prop(w: u8, h: u8, seed: u64) -> TestResult {
            let (w, h) = (w as usize % 14 + 1, h as usize % 14 + 1);
            for algorithm in GeneratorAlgorithm::ALL.iter().cloned() {
                let grid = maze(w, h, algorithm, seed);
                if grid.removed_walls_count() != w * h - 1 || !validation::is_perfect(&grid) {
                    return TestResult::failed();
                }
            }
            TestResult::passed()
        }
        quickcheck(prop as fn(u8, u8, u64) -> TestResult);
    }

    #[test]
    fn same_seed_same_maze() {
        fn prop(w: u8, h: u8, seed: u64) -> bool {
            let (w, h) = (w as usize % 16 + 1, h as usize % 16 + 1);
            GeneratorAlgorithm::ALL.iter().all(|&algorithm| {
                maze(w, h, algorithm, seed) == maze(w, h, algorithm, seed)
            })
        }
        quickcheck(prop as fn(u8, u8, u64) -> bool);
    }

    #[test]
    fn different_seeds_give_different_mazes() {
        for algorithm in GeneratorAlgorithm::ALL.iter().cloned() {
            let a = maze(20, 20, algorithm, 1);
            let b = maze(20, 20, algorithm, 2);
            assert_ne!(a, b, "{} ignored its seed", algorithm);
        }
    }

    #[test]
    fn single_cell_grid_has_no_passages() {
        for algorithm in GeneratorAlgorithm::ALL.iter().cloned() {
            let grid = maze(1, 1, algorithm, 3);
            assert_eq!(grid.removed_walls_count(), 0);
            assert!(grid.is_pristine());
        }
    }

    #[test]
    fn two_cell_grid_always_opens_the_middle_wall() {
        let mazes = GeneratorAlgorithm::ALL.iter()
            .map(|&algorithm| maze(2, 1, algorithm, 11))
            .collect::<Vec<_>>();
        for grid in &mazes {
            assert_eq!(grid.removed_walls_count(), 1);
            assert!(!grid.has_wall(GridCoordinate::new(0, 0), CompassPrimary::East));
            assert_eq!(*grid, mazes[0]);
        }
    }

    #[test]
    fn generators_are_single_use() {
        for algorithm in GeneratorAlgorithm::ALL.iter().cloned() {
            let mut grid = maze(4, 4, algorithm, 5);
            let before = grid.clone();
            let mut rng = seeded_rng(6);
            match algorithm.generate(&mut grid, &mut rng) {
                Err(e) => assert!(matches!(*e.kind(), ErrorKind::AlreadyGenerated)),
                Ok(()) => panic!("{} regenerated a finished maze", algorithm),
            }
            assert_eq!(grid, before);
        }
    }

    #[test]
    fn hand_carved_grid_rejected() {
        let mut grid = Grid::new(Width(3), Height(3)).unwrap();
        grid.remove_wall(GridCoordinate::new(1, 1), CompassPrimary::North).unwrap();
        let mut rng = seeded_rng(0);
        assert!(kruskal(&mut grid, &mut rng).is_err());
    }

    #[test]
    fn wilson_reports_a_stall() {
        init_logging();
        let mut grid = Grid::new(Width(6), Height(6)).unwrap();
        let mut rng = seeded_rng(8);
        match wilson_with_step_limit(&mut grid, &mut rng, 10) {
            Err(e) => match *e.kind() {
                ErrorKind::GenerationStalled(steps) => assert_eq!(steps, 10),
                ref other => panic!("unexpected error kind {:?}", other),
            },
            Ok(()) => panic!("36 cells cannot be joined in 10 steps"),
        }

        // A fresh grid with the default limit gets there.
        let mut grid = Grid::new(Width(6), Height(6)).unwrap();
        wilson(&mut grid, &mut rng).expect("default limit is generous");
        assert_spanning_tree(&grid);
    }

    #[test]
    fn wilson_without_steps_is_fine_on_one_cell() {
        let mut grid = Grid::new(Width(1), Height(1)).unwrap();
        let mut rng = seeded_rng(8);
        assert!(wilson_with_step_limit(&mut grid, &mut rng, 0).is_ok());
    }

    #[test]
    fn backtracker_handles_big_grids() {
        let grid = maze(400, 400, GeneratorAlgorithm::RecursiveBacktracker, 99);
        assert_eq!(grid.removed_walls_count(), 400 * 400 - 1);
    }

    #[test]
    fn backtracker_grows_from_the_start_marker() {
        // Starting half way down a 1 wide corridor still has to reach both ends.
        let mut grid = Grid::new(Width(1), Height(5)).unwrap();
        grid.set_start(GridCoordinate::new(0, 2)).unwrap();
        let mut rng = seeded_rng(4);
        recursive_backtracker(&mut grid, &mut rng).unwrap();
        assert_spanning_tree(&grid);
    }

    #[test]
    fn algorithm_names() {
        for algorithm in GeneratorAlgorithm::ALL.iter().cloned() {
            assert_eq!(algorithm.name().parse::<GeneratorAlgorithm>().unwrap(), algorithm);
            assert_eq!(algorithm.to_string(), algorithm.name());
        }
        assert_eq!("recursive-backtracker".parse::<GeneratorAlgorithm>().unwrap(),
                   GeneratorAlgorithm::RecursiveBacktracker);
        assert_eq!(" Kruskal ".parse::<GeneratorAlgorithm>().unwrap(), GeneratorAlgorithm::Kruskal);

        match "eller".parse::<GeneratorAlgorithm>() {
            Err(e) => match *e.kind() {
                ErrorKind::UnknownAlgorithm(ref name) => assert_eq!(name, "eller"),
                ref other => panic!("unexpected error kind {:?}", other),
            },
            Ok(a) => panic!("parsed {:?}", a),
        }
    }

    #[test]
    fn new_maze_rejects_bad_dimensions() {
        let result = new_maze(Width(0), Height(3), GeneratorAlgorithm::Prim, 1);
        match result {
            Err(e) => assert!(matches!(*e.kind(), ErrorKind::InvalidDimensions(0, 3))),
            Ok(g) => panic!("built {:?}", g),
        }
    }
}

//! Maze solvers and flood fill distances.
//!
//! Solvers only ever read the grid. All of their bookkeeping (visited sets, parent links,
//! priority queues) lives in maps local to a single call, so one finished maze can be solved
//! by any number of solvers at once, from any number of threads.
//!
//! Not finding a path is not an error: a hand edited grid may well be disconnected. The
//! `Solution` then has an empty path and records everything the search looked at.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use error_chain::bail;
use itertools::Itertools;
use log::{debug, trace, warn};
use num::traits::{Bounded, CheckedAdd, One, Unsigned, Zero};
use serde_derive::Deserialize;
use smallvec::SmallVec;

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::errors::*;
use crate::grid::Grid;
use crate::utils::{self, FnvHashMap, FnvHashSet};


// Trait (hack) used purely as a generic type parameter alias because it looks ugly to type this out each time
// Note generic parameter type aliases are not in the langauge.
// Costs are unsigned so relaxing an edge can never make a route cheaper than its prefix.
pub trait PathCost
    : Zero + One + Bounded + Unsigned + CheckedAdd + Debug + Clone + Copy + Display + Ord
    {
}
impl<T: Zero + One + Bounded + Unsigned + CheckedAdd + Debug + Clone + Copy + Display + Ord> PathCost for T {}


/// The outcome of one solver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution<CostT = usize> {
    path: Vec<GridCoordinate>,
    visited: Vec<GridCoordinate>,
    cost: Option<CostT>,
}

impl<CostT: Copy> Solution<CostT> {
    fn solved(path: Vec<GridCoordinate>, visited: Vec<GridCoordinate>, cost: CostT) -> Self {
        Solution { path, visited, cost: Some(cost) }
    }

    fn unsolved(visited: Vec<GridCoordinate>) -> Self {
        Solution { path: vec![], visited, cost: None }
    }

    /// Cells from start to end inclusive, empty if the end cannot be reached.
    #[inline]
    pub fn path(&self) -> &[GridCoordinate] {
        &self.path
    }

    /// Every cell the search visited, each once, in the order first visited.
    #[inline]
    pub fn visited(&self) -> &[GridCoordinate] {
        &self.visited
    }

    /// Total cost of the path. None when there is no path.
    #[inline]
    pub fn cost(&self) -> Option<CostT> {
        self.cost
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of steps (passages walked through) along the path.
    pub fn length(&self) -> Option<usize> {
        if self.path.is_empty() {
            None
        } else {
            Some(self.path.len() - 1)
        }
    }

    pub fn visited_set(&self) -> FnvHashSet<GridCoordinate> {
        self.visited.iter().cloned().collect()
    }
}

impl<CostT: Copy + Display> Display for Solution<CostT> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.cost {
            Some(cost) => write!(f, "cost {}: {}", cost, self.path.iter().join(" -> ")),
            None => write!(f, "no path, {} cells searched", self.visited.len()),
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Deserialize)]
pub enum SolverAlgorithm {
    #[serde(rename = "bfs")]
    BreadthFirst,
    #[serde(rename = "dfs")]
    DepthFirst,
    #[serde(rename = "dijkstra")]
    Dijkstra,
    #[serde(rename = "astar", alias = "a-star")]
    AStar,
    #[serde(rename = "wall-follower")]
    WallFollower,
}

impl SolverAlgorithm {
    pub const ALL: [SolverAlgorithm; 5] = [SolverAlgorithm::BreadthFirst,
                                           SolverAlgorithm::DepthFirst,
                                           SolverAlgorithm::Dijkstra,
                                           SolverAlgorithm::AStar,
                                           SolverAlgorithm::WallFollower];

    pub fn name(self) -> &'static str {
        match self {
            SolverAlgorithm::BreadthFirst => "bfs",
            SolverAlgorithm::DepthFirst => "dfs",
            SolverAlgorithm::Dijkstra => "dijkstra",
            SolverAlgorithm::AStar => "astar",
            SolverAlgorithm::WallFollower => "wall-follower",
        }
    }

    /// Does this solver always find a shortest path?
    pub fn is_optimal(self) -> bool {
        match self {
            SolverAlgorithm::BreadthFirst | SolverAlgorithm::Dijkstra | SolverAlgorithm::AStar => true,
            SolverAlgorithm::DepthFirst | SolverAlgorithm::WallFollower => false,
        }
    }

    pub fn solve(self, grid: &Grid, start: GridCoordinate, end: GridCoordinate) -> Result<Solution> {
        let solution = match self {
            SolverAlgorithm::BreadthFirst => breadth_first(grid, start, end),
            SolverAlgorithm::DepthFirst => depth_first(grid, start, end),
            SolverAlgorithm::Dijkstra => dijkstra(grid, start, end),
            SolverAlgorithm::AStar => a_star(grid, start, end),
            SolverAlgorithm::WallFollower => wall_follower(grid, start, end),
        }?;
        debug!("{} from {} to {}: path length {:?}, {} cells visited",
               self, start, end, solution.length(), solution.visited().len());
        Ok(solution)
    }

    /// Solve between the grid's own start and end markers.
    pub fn solve_markers(self, grid: &Grid) -> Result<Solution> {
        self.solve(grid, grid.start(), grid.end())
    }
}

impl fmt::Display for SolverAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<SolverAlgorithm> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(SolverAlgorithm::BreadthFirst),
            "dfs" => Ok(SolverAlgorithm::DepthFirst),
            "dijkstra" => Ok(SolverAlgorithm::Dijkstra),
            "astar" | "a-star" => Ok(SolverAlgorithm::AStar),
            "wall-follower" => Ok(SolverAlgorithm::WallFollower),
            _ => bail!(ErrorKind::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Breadth first search. Explores in rings of increasing distance from the start, so the first
/// time the end comes off the queue it has been reached by a shortest path.
pub fn breadth_first(grid: &Grid, start: GridCoordinate, end: GridCoordinate) -> Result<Solution> {
    check_endpoints(grid, start, end)?;

    let capacity = utils::side_table_capacity(grid.size());
    let mut parents = utils::fnv_hashmap(capacity);
    let mut discovered = utils::fnv_hashset(capacity);
    let mut visited = vec![];
    let mut queue = VecDeque::new();

    discovered.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        visited.push(current);
        if current == end {
            let path = walk_parents(&parents, start, end);
            let cost = path.len() - 1;
            return Ok(Solution::solved(path, visited, cost));
        }

        for (_, neighbour) in grid.passable_neighbours(current) {
            if discovered.insert(neighbour) {
                parents.insert(neighbour, current);
                queue.push_back(neighbour);
            }
        }
    }

    Ok(Solution::unsolved(visited))
}

/// Depth first search. Returns the first path it stumbles on, which on a maze with loops need
/// not be the shortest. On a perfect maze there is only one path anyway.
pub fn depth_first(grid: &Grid, start: GridCoordinate, end: GridCoordinate) -> Result<Solution> {
    check_endpoints(grid, start, end)?;

    let capacity = utils::side_table_capacity(grid.size());
    let mut parents = utils::fnv_hashmap(capacity);
    let mut discovered = utils::fnv_hashset(capacity);
    let mut visited = vec![];
    let mut stack = vec![start];
    discovered.insert(start);

    while let Some(current) = stack.pop() {
        visited.push(current);
        if current == end {
            let path = walk_parents(&parents, start, end);
            let cost = path.len() - 1;
            return Ok(Solution::solved(path, visited, cost));
        }

        for (_, neighbour) in grid.passable_neighbours(current) {
            if discovered.insert(neighbour) {
                parents.insert(neighbour, current);
                stack.push(neighbour);
            }
        }
    }

    Ok(Solution::unsolved(visited))
}

/// Dijkstra's shortest path with every passage costing 1.
///
/// On a unit cost maze this finds the same length of path as breadth first search; it is kept as
/// a real weighted relaxation (see `dijkstra_with_weights`) so weighted passages need no new
/// solver.
pub fn dijkstra(grid: &Grid, start: GridCoordinate, end: GridCoordinate) -> Result<Solution> {
    dijkstra_with_weights(grid, start, end, |_, _| 1usize)
}

/// Dijkstra's shortest path where walking from one cell into a linked neighbour costs
/// `passage_cost(from, to)`. Equal cost entries leave the queue in the order they were queued.
///
/// A passage that would take a route's cost past `CostT::max_value()` is never walked, so with
/// small cost types a far away end can come back unreachable.
pub fn dijkstra_with_weights<CostT, F>(grid: &Grid,
                                       start: GridCoordinate,
                                       end: GridCoordinate,
                                       passage_cost: F)
                                       -> Result<Solution<CostT>>
    where CostT: PathCost,
          F: FnMut(GridCoordinate, GridCoordinate) -> CostT
{
    best_first(grid, start, end, passage_cost, |_| CostT::zero())
}

/// A* search guided by the Manhattan distance to the end.
///
/// With only 4 way moves of cost 1 that heuristic never overestimates and is consistent, so the
/// path found is a shortest one. Ties on the estimated total go to whichever entry was queued
/// first, keeping results identical between runs.
pub fn a_star(grid: &Grid, start: GridCoordinate, end: GridCoordinate) -> Result<Solution> {
    best_first(grid, start, end, |_, _| 1usize, |coord| coord.manhattan_distance(end) as usize)
}

/// Shared priority queue search: entries are ordered by `cost so far + heuristic`, then by
/// insertion sequence.
fn best_first<CostT, F, H>(grid: &Grid,
                           start: GridCoordinate,
                           end: GridCoordinate,
                           mut passage_cost: F,
                           heuristic: H)
                           -> Result<Solution<CostT>>
    where CostT: PathCost,
          F: FnMut(GridCoordinate, GridCoordinate) -> CostT,
          H: Fn(GridCoordinate) -> CostT
{
    check_endpoints(grid, start, end)?;

    let capacity = utils::side_table_capacity(grid.size());
    let mut costs: FnvHashMap<GridCoordinate, CostT> = utils::fnv_hashmap(capacity);
    let mut parents = utils::fnv_hashmap(capacity);
    let mut settled = utils::fnv_hashset(capacity);
    let mut visited = vec![];
    let mut queue = BinaryHeap::new();
    let mut sequence: u64 = 0;

    costs.insert(start, CostT::zero());
    queue.push(Reverse((heuristic(start), sequence, start)));

    while let Some(Reverse((_, _, current))) = queue.pop() {
        // Stale entry - the cell was settled via a cheaper route queued later.
        if !settled.insert(current) {
            continue;
        }
        visited.push(current);

        let current_cost = costs[&current];
        if current == end {
            let path = walk_parents(&parents, start, end);
            return Ok(Solution::solved(path, visited, current_cost));
        }

        for (_, neighbour) in grid.passable_neighbours(current) {
            if settled.contains(&neighbour) {
                continue;
            }

            // A route whose cost does not fit in CostT is no route at all. The heuristic never
            // overestimates, so an overflowing estimate means every completion overflows too.
            let relaxed = current_cost.checked_add(&passage_cost(current, neighbour))
                .and_then(|cost| cost.checked_add(&heuristic(neighbour)).map(|estimate| (cost, estimate)));
            let (candidate, estimate) = match relaxed {
                Some(pair) => pair,
                None => {
                    trace!("cost overflow walking {} -> {}, passage skipped", current, neighbour);
                    continue;
                }
            };

            let improves = costs.get(&neighbour).map_or(true, |&known| candidate < known);
            if improves {
                costs.insert(neighbour, candidate);
                parents.insert(neighbour, current);
                sequence += 1;
                queue.push(Reverse((estimate, sequence, neighbour)));
            }
        }
    }

    Ok(Solution::unsolved(visited))
}

/// Follow the wall on the right hand side until the end turns up.
///
/// Only the current position and facing decide each move: turn right if there is an opening,
/// else go straight, else turn left, else turn back. Any maze without loops is solved this way,
/// as the walk tours the whole passage tree, using each passage at most twice. With loops the
/// walk can circle forever, so it gives up (empty path) after `4 * cells` steps.
///
/// The walk itself doubles back out of every dead end it explores. Those detours are cut out of
/// the reported path as they happen, leaving a simple path; the visited cells keep the whole tour.
/// That reporting needs a map of where each cell sits on the route so far plus a seen set, but
/// neither is ever consulted when choosing a move. The path returned is therefore the loop erased
/// walk, not the raw sequence of steps taken.
pub fn wall_follower(grid: &Grid, start: GridCoordinate, end: GridCoordinate) -> Result<Solution> {
    check_endpoints(grid, start, end)?;

    let step_limit = grid.size().saturating_mul(4);
    let capacity = utils::side_table_capacity(grid.size());
    let mut route = vec![start];
    let mut route_positions: FnvHashMap<GridCoordinate, usize> = utils::fnv_hashmap(capacity);
    route_positions.insert(start, 0);
    let mut seen = utils::fnv_hashset(capacity);
    seen.insert(start);
    let mut visited = vec![start];

    // Start facing north; the first move is then the east passage if there is one.
    let mut facing = CompassPrimary::North;
    let mut position = start;
    let mut steps = 0;

    while position != end {
        if steps >= step_limit {
            warn!("wall follower from {} to {} gave up after {} steps", start, end, steps);
            return Ok(Solution::unsolved(visited));
        }

        let choices = [facing.turn_right(), facing, facing.turn_left(), facing.opposite()];
        let next_move = choices.iter()
            .cloned()
            .filter(|dir| !grid.has_wall(position, *dir))
            .find_map(|dir| grid.neighbour_at_direction(position, dir).map(|next| (dir, next)));

        let (direction, next) = match next_move {
            Some(step) => step,
            None => {
                // Walled in on all 4 sides.
                return Ok(Solution::unsolved(visited));
            }
        };
        steps += 1;
        facing = direction;
        position = next;

        if seen.insert(next) {
            visited.push(next);
        }
        match route_positions.get(&next).cloned() {
            Some(earlier) => {
                for retreated in route.drain(earlier + 1..) {
                    route_positions.remove(&retreated);
                }
            }
            None => {
                route_positions.insert(next, route.len());
                route.push(next);
            }
        }
    }

    let cost = route.len() - 1;
    Ok(Solution::solved(route, visited, cost))
}

fn check_endpoints(grid: &Grid, start: GridCoordinate, end: GridCoordinate) -> Result<()> {
    grid.checked_index(start)?;
    grid.checked_index(end)?;
    Ok(())
}

/// Follow parent links back from `end` to `start`, returning the path start first.
fn walk_parents(parents: &FnvHashMap<GridCoordinate, GridCoordinate>,
                start: GridCoordinate,
                end: GridCoordinate)
                -> Vec<GridCoordinate> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        current = parents[&current];
        path.push(current);
    }
    path.reverse();
    path
}


/// Flood fill distances (in steps) from a start cell to every cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: GridCoordinate,
    distances: FnvHashMap<GridCoordinate, usize>,
    max_distance: usize,
}

impl Distances {
    /// None if `start_coordinate` is not on the grid.
    pub fn for_grid(grid: &Grid, start_coordinate: GridCoordinate) -> Option<Distances> {

        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let mut max = 0;
        let mut distances = utils::fnv_hashmap(grid.size());
        distances.insert(start_coordinate, 0);

        // Every step is just one from the previous cell, so a cell's distance is final the first
        // time it is reached - the map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                let distance_to_cell = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for (_, link_coordinate) in grid.passable_neighbours(*cell_coord) {
                    if !distances.contains_key(&link_coordinate) {
                        distances.insert(link_coordinate, distance_to_cell + 1);
                        new_frontier.push(link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> usize {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<usize> {
        self.distances.get(&coord).cloned()
    }

    /// How many cells (the start included) can be reached.
    #[inline]
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    pub fn furthest_points_on_grid(&self) -> SmallVec<[GridCoordinate; 8]> {
        let furthest_distance = self.max();
        self.distances.iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .sorted()
            .collect()
    }
}

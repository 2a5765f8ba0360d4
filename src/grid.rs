use std::fmt;

use error_chain::bail;
use log::trace;

use crate::cells::{CompassPrimary, DirectedNeighbours, GridCoordinate, WallMask};
use crate::errors::*;
use crate::grid_iterators::{CellIter, LinksIter};
use crate::random::{self, MazeRng};
use crate::units::{EdgesCount, Height, NodesCount, Width};

/// A rectangular grid of cells, each surrounded by up to 4 walls.
///
/// A new grid has every wall standing. Carving passages means removing walls, which is always
/// done on both sides of the wall so the two cells agree. The outer boundary can never be
/// removed. The grid holds no per algorithm state, so a finished maze can be shared between any
/// number of solvers, including across threads.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: Width,
    height: Height,
    walls: Vec<WallMask>,
    removed_walls: usize,
    start: GridCoordinate,
    end: GridCoordinate,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, removed walls: {:?}, start: {}, end: {}",
               self.width.0, self.height.0, self.removed_walls, self.start, self.end)
    }
}

impl Grid {
    /// A fully walled `width * height` grid, start marker in the north west corner and end
    /// marker in the south east corner.
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        if w < 1 || h < 1 {
            bail!(ErrorKind::InvalidDimensions(w, h));
        }
        // Every cell must be addressable with u32 coordinates and a usize index.
        let cells_count = match w.checked_mul(h) {
            Some(count) if w <= u32::MAX as usize && h <= u32::MAX as usize => count,
            _ => bail!(ErrorKind::InvalidDimensions(w, h)),
        };

        Ok(Grid {
            width,
            height,
            walls: vec![WallMask::ALL_WALLS; cells_count],
            removed_walls: 0,
            start: GridCoordinate::new(0, 0),
            end: GridCoordinate::new((w - 1) as u32, (h - 1) as u32),
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width.0
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height.0
    }

    #[inline]
    pub fn dimensions(&self) -> (Width, Height) {
        (self.width, self.height)
    }

    /// Number of cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.walls.len()
    }

    #[inline]
    pub fn nodes_count(&self) -> NodesCount {
        NodesCount(self.size())
    }

    /// Number of passages carved so far.
    #[inline]
    pub fn removed_walls_count(&self) -> usize {
        self.removed_walls
    }

    #[inline]
    pub fn links_count(&self) -> EdgesCount {
        EdgesCount(self.removed_walls)
    }

    /// True while no internal wall has been removed - the only state a generator accepts.
    #[inline]
    pub fn is_pristine(&self) -> bool {
        self.removed_walls == 0
    }

    #[inline]
    pub fn start(&self) -> GridCoordinate {
        self.start
    }

    #[inline]
    pub fn end(&self) -> GridCoordinate {
        self.end
    }

    pub fn set_start(&mut self, coord: GridCoordinate) -> Result<()> {
        self.checked_index(coord)?;
        self.start = coord;
        Ok(())
    }

    pub fn set_end(&mut self, coord: GridCoordinate) -> Result<()> {
        self.checked_index(coord)?;
        self.end = coord;
        Ok(())
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    /// Convert a grid coordinate to a one dimensional row major index in the range 0..grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    /// Inverse of `coordinate_to_index`. `index` must be less than `size()`.
    #[inline]
    pub fn index_to_coordinate(&self, index: usize) -> GridCoordinate {
        debug_assert!(index < self.size(), "cell index {} out of range", index);
        GridCoordinate::new((index % self.width.0) as u32, (index / self.width.0) as u32)
    }

    /// The cell index of `coord`, or an `OutOfBounds` error.
    pub fn checked_index(&self, coord: GridCoordinate) -> Result<usize> {
        self.coordinate_to_index(coord)
            .ok_or_else(|| ErrorKind::OutOfBounds(coord.x as i64, coord.y as i64).into())
    }

    /// The walls around a cell, None for coordinates off the grid.
    #[inline]
    pub fn walls(&self, coord: GridCoordinate) -> Option<WallMask> {
        self.coordinate_to_index(coord).map(|index| self.walls[index])
    }

    /// Is there a wall on the `direction` side of the cell?
    /// Everything off the grid counts as solid wall.
    #[inline]
    pub fn has_wall(&self, coord: GridCoordinate, direction: CompassPrimary) -> bool {
        self.walls(coord).map_or(true, |mask| mask.contains(direction))
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<GridCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        coord.offset(direction).filter(|neighbour| self.is_valid_coordinate(*neighbour))
    }

    /// Cells that are to the North, East, South or West of a particular cell (in that order),
    /// whether or not a wall stands between them.
    pub fn neighbours(&self, coord: GridCoordinate) -> DirectedNeighbours {
        CompassPrimary::ALL.iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir).map(|n| (*dir, n)))
            .collect()
    }

    /// Neighbouring cells reachable through a missing wall.
    pub fn passable_neighbours(&self, coord: GridCoordinate) -> DirectedNeighbours {
        match self.walls(coord) {
            Some(mask) => {
                self.neighbours(coord)
                    .into_iter()
                    .filter(|&(dir, _)| !mask.contains(dir))
                    .collect()
            }
            None => DirectedNeighbours::new(),
        }
    }

    /// Is there an open passage between two cells?
    pub fn is_linked(&self, a: GridCoordinate, b: GridCoordinate) -> bool {
        a.direction_to(b).map_or(false, |dir| !self.has_wall(a, dir) && self.is_valid_coordinate(b))
    }

    /// Knock down the wall on the `direction` side of a cell and the matching wall of its
    /// neighbour. Removing an already removed wall changes nothing.
    ///
    /// Fails with `OutOfBounds` if the cell is off the grid or the wall is part of the outer
    /// boundary (there is no neighbour in that direction).
    pub fn remove_wall(&mut self, coord: GridCoordinate, direction: CompassPrimary) -> Result<()> {
        let (index, neighbour_index) = self.wall_indices(coord, direction)?;
        if self.walls[index].contains(direction) {
            self.walls[index].remove(direction);
            self.walls[neighbour_index].remove(direction.opposite());
            self.removed_walls += 1;
            trace!("removed {:?} wall of {}", direction, coord);
        }
        Ok(())
    }

    /// Put back the wall on the `direction` side of a cell, on both sides.
    /// Same failure rules as `remove_wall`.
    pub fn add_wall(&mut self, coord: GridCoordinate, direction: CompassPrimary) -> Result<()> {
        let (index, neighbour_index) = self.wall_indices(coord, direction)?;
        if !self.walls[index].contains(direction) {
            self.walls[index].insert(direction);
            self.walls[neighbour_index].insert(direction.opposite());
            self.removed_walls -= 1;
            trace!("added {:?} wall of {}", direction, coord);
        }
        Ok(())
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.width.0, self.size())
    }

    pub fn iter_links(&self) -> LinksIter {
        LinksIter::new(self)
    }

    pub fn random_cell(&self, rng: &mut MazeRng) -> GridCoordinate {
        let index = random::random_index(rng, self.size());
        self.index_to_coordinate(index)
    }

    /// Panics in debug builds if any two neighbouring cells disagree about the wall between
    /// them, or the boundary has a gap. A no-op in release builds.
    pub fn debug_assert_consistent(&self) {
        if cfg!(debug_assertions) {
            for coord in self.iter() {
                for dir in CompassPrimary::ALL.iter().cloned() {
                    match self.neighbour_at_direction(coord, dir) {
                        Some(neighbour) => {
                            debug_assert_eq!(self.has_wall(coord, dir),
                                             self.has_wall(neighbour, dir.opposite()),
                                             "asymmetric wall between {} and {}", coord, neighbour)
                        }
                        None => {
                            debug_assert!(self.has_wall(coord, dir),
                                          "boundary wall missing at {} {:?}", coord, dir)
                        }
                    }
                }
            }
            debug_assert_eq!(self.removed_walls, self.iter_links().count());
        }
    }

    fn wall_indices(&self, coord: GridCoordinate, direction: CompassPrimary) -> Result<(usize, usize)> {
        let index = self.checked_index(coord)?;
        match self.neighbour_at_direction(coord, direction) {
            Some(neighbour) => Ok((index, self.checked_index(neighbour)?)),
            None => {
                let (x, y) = off_grid_target(coord, direction);
                bail!(ErrorKind::OutOfBounds(x, y))
            }
        }
    }
}

fn off_grid_target(coord: GridCoordinate, direction: CompassPrimary) -> (i64, i64) {
    let (x, y) = (coord.x as i64, coord.y as i64);
    match direction {
        CompassPrimary::North => (x, y - 1),
        CompassPrimary::East => (x + 1, y),
        CompassPrimary::South => (x, y + 1),
        CompassPrimary::West => (x - 1, y),
    }
}

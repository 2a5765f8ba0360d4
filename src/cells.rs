use std::fmt;

use smallvec::SmallVec;

/// Position of a cell on the grid. `x` is the column, `y` the row, `(0, 0)` the top left (north
/// west) corner.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub x: u32,
    pub y: u32,
}

pub type DirectedNeighbours = SmallVec<[(CompassPrimary, GridCoordinate); 4]>;

impl GridCoordinate {
    pub fn new(x: u32, y: u32) -> GridCoordinate {
        GridCoordinate { x, y }
    }

    /// Creates a new coordinate offset 1 cell away in the given direction.
    /// Returns None if the coordinate is not representable (moving north of row 0, west of
    /// column 0, or past `u32::MAX`). Whether the result is on a particular grid is for the
    /// grid to decide.
    pub fn offset(self, dir: CompassPrimary) -> Option<GridCoordinate> {
        let (x, y) = (self.x, self.y);
        match dir {
            CompassPrimary::North => y.checked_sub(1).map(|y| GridCoordinate::new(x, y)),
            CompassPrimary::South => y.checked_add(1).map(|y| GridCoordinate::new(x, y)),
            CompassPrimary::East => x.checked_add(1).map(|x| GridCoordinate::new(x, y)),
            CompassPrimary::West => x.checked_sub(1).map(|x| GridCoordinate::new(x, y)),
        }
    }

    /// The direction to take from `self` to reach an orthogonally adjacent `other`.
    pub fn direction_to(self, other: GridCoordinate) -> Option<CompassPrimary> {
        CompassPrimary::ALL.iter()
            .cloned()
            .find(|dir| self.offset(*dir) == Some(other))
    }

    /// Manhattan (taxicab) distance, the admissible A* heuristic for 4-way movement.
    #[inline]
    pub fn manhattan_distance(self, other: GridCoordinate) -> u32 {
        let dx = if self.x > other.x { self.x - other.x } else { other.x - self.x };
        let dy = if self.y > other.y { self.y - other.y } else { other.y - self.y };
        dx + dy
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    East,
    South,
    West,
}

impl CompassPrimary {
    /// Clockwise order starting north. Neighbour enumeration uses this order everywhere so
    /// that seeded generation is reproducible.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::East,
                                          CompassPrimary::South,
                                          CompassPrimary::West];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    pub fn turn_right(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::East,
            CompassPrimary::East => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::North,
        }
    }

    pub fn turn_left(self) -> CompassPrimary {
        self.turn_right().opposite()
    }

    #[inline]
    fn wall_bit(self) -> u8 {
        match self {
            CompassPrimary::North => 0b0001,
            CompassPrimary::East => 0b0010,
            CompassPrimary::South => 0b0100,
            CompassPrimary::West => 0b1000,
        }
    }
}

/// The 4 walls of a cell packed into the low bits of a byte. A set bit is a standing wall.
#[derive(Eq, PartialEq, Copy, Clone, Hash)]
pub struct WallMask(u8);

impl WallMask {
    pub const ALL_WALLS: WallMask = WallMask(0b1111);

    #[inline]
    pub fn contains(self, dir: CompassPrimary) -> bool {
        self.0 & dir.wall_bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, dir: CompassPrimary) {
        self.0 |= dir.wall_bit();
    }

    #[inline]
    pub fn remove(&mut self, dir: CompassPrimary) {
        self.0 &= !dir.wall_bit();
    }

    /// Number of walls still standing around the cell.
    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Directions with no wall.
    pub fn open_directions(self) -> SmallVec<[CompassPrimary; 4]> {
        CompassPrimary::ALL.iter()
            .cloned()
            .filter(|dir| !self.contains(*dir))
            .collect()
    }
}

impl Default for WallMask {
    fn default() -> Self {
        WallMask::ALL_WALLS
    }
}

impl fmt::Debug for WallMask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "WallMask({:04b})", self.0)
    }
}

use std::fmt;

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::grid::Grid;

/// Row major iteration over every cell coordinate of a grid.
#[derive(Clone)]
pub struct CellIter {
    row_length: usize,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub(crate) fn new(row_length: usize, cells_count: usize) -> CellIter {
        CellIter {
            row_length,
            current_cell_number: 0,
            cells_count,
        }
    }
}

impl fmt::Debug for CellIter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "CellIter :: current_cell_number: {:?}, cells_count: {:?}",
               self.current_cell_number,
               self.cells_count)
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = GridCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let index = self.current_cell_number;
            let coord = GridCoordinate::new((index % self.row_length) as u32,
                                            (index / self.row_length) as u32);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}

/// Every removed wall (passage) of a grid as a pair of cell coordinates, each passage once.
///
/// Only the east and south side of each cell is inspected, so `(a, b)` always has `b` east or
/// south of `a`.
pub struct LinksIter<'a> {
    grid: &'a Grid,
    cells: CellIter,
    pending: Option<GridCoordinate>,
}

impl<'a> LinksIter<'a> {
    pub(crate) fn new(grid: &'a Grid) -> LinksIter<'a> {
        LinksIter {
            grid,
            cells: grid.iter(),
            pending: None,
        }
    }

    fn link_at(&self, coord: GridCoordinate, dir: CompassPrimary) -> Option<(GridCoordinate, GridCoordinate)> {
        if self.grid.has_wall(coord, dir) {
            None
        } else {
            self.grid.neighbour_at_direction(coord, dir).map(|neighbour| (coord, neighbour))
        }
    }
}

impl<'a> Iterator for LinksIter<'a> {
    type Item = (GridCoordinate, GridCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // The south link of the previous cell is looked at after its east link.
            if let Some(coord) = self.pending.take() {
                if let Some(link) = self.link_at(coord, CompassPrimary::South) {
                    return Some(link);
                }
            }

            let coord = self.cells.next()?;
            self.pending = Some(coord);
            if let Some(link) = self.link_at(coord, CompassPrimary::East) {
                return Some(link);
            }
        }
    }
}

impl<'a> fmt::Debug for LinksIter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinksIter :: cells iter : {:?}", self.cells)
    }
}

//! Checks that a grid is a perfect maze: every cell reachable from every other by exactly one
//! route.
//!
//! The passages are copied into a petgraph graph, one node per cell in row major order, so
//! node index `i` is the cell at `grid.index_to_coordinate(i)`.

use error_chain::bail;
use petgraph::algo::{connected_components, is_cyclic_undirected};
use petgraph::graph::{NodeIndex, UnGraph};

use crate::cells::GridCoordinate;
use crate::errors::*;
use crate::grid::Grid;
use crate::units::EdgesCount;

/// Undirected graph of the grid's passages. Nodes are weighted with their cell coordinate.
pub fn passage_graph(grid: &Grid) -> UnGraph<GridCoordinate, ()> {
    let EdgesCount(links) = grid.links_count();
    let mut graph = UnGraph::with_capacity(grid.size(), links);
    for coord in grid.iter() {
        let _ = graph.add_node(coord);
    }

    for (a, b) in grid.iter_links() {
        let a_index = grid.coordinate_to_index(a).expect("links only join cells on the grid");
        let b_index = grid.coordinate_to_index(b).expect("links only join cells on the grid");
        let _ = graph.add_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), ());
    }
    graph
}

/// Ok if the grid is connected and free of loops, otherwise a `NotPerfect` error saying which
/// it is not.
pub fn check_perfect(grid: &Grid) -> Result<()> {
    let graph = passage_graph(grid);

    let components = connected_components(&graph);
    if components != 1 {
        bail!(ErrorKind::NotPerfect(format!("{} disconnected regions", components)));
    }
    if is_cyclic_undirected(&graph) {
        bail!(ErrorKind::NotPerfect("passages form a loop".to_string()));
    }

    // Connected and acyclic already implies this, it is the cheap thing to report on failure.
    let expected_links = grid.nodes_count().spanning_tree_edges();
    if grid.links_count() != expected_links {
        bail!(ErrorKind::NotPerfect(format!("{} passages, a spanning tree has {}",
                                            graph.edge_count(),
                                            expected_links.0)));
    }
    Ok(())
}

#[inline]
pub fn is_perfect(grid: &Grid) -> bool {
    check_perfect(grid).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::CompassPrimary;
    use crate::generators::{new_maze, GeneratorAlgorithm};
    use crate::units::{Height, Width};

    fn gc(x: u32, y: u32) -> GridCoordinate {
        GridCoordinate::new(x, y)
    }

    fn not_perfect_reason(grid: &Grid) -> String {
        let err = check_perfect(grid).expect_err("grid should not be perfect");
        match *err.kind() {
            ErrorKind::NotPerfect(ref reason) => reason.clone(),
            ref other => panic!("expected NotPerfect, got {:?}", other),
        }
    }

    #[test]
    fn single_cell_is_perfect() {
        let g = Grid::new(Width(1), Height(1)).unwrap();
        assert!(is_perfect(&g));
        assert_eq!(passage_graph(&g).node_count(), 1);
    }

    #[test]
    fn walled_grid_is_disconnected() {
        let g = Grid::new(Width(3), Height(2)).unwrap();
        assert_eq!(not_perfect_reason(&g), "6 disconnected regions");
    }

    #[test]
    fn loops_are_rejected() {
        let mut g = Grid::new(Width(2), Height(2)).unwrap();
        g.remove_wall(gc(0, 0), CompassPrimary::East).unwrap();
        g.remove_wall(gc(0, 0), CompassPrimary::South).unwrap();
        g.remove_wall(gc(1, 1), CompassPrimary::North).unwrap();
        assert!(is_perfect(&g));

        g.remove_wall(gc(1, 1), CompassPrimary::West).unwrap();
        assert_eq!(not_perfect_reason(&g), "passages form a loop");

        g.add_wall(gc(0, 0), CompassPrimary::East).unwrap();
        assert!(is_perfect(&g));
    }

    #[test]
    fn graph_mirrors_passages() {
        let mut g = Grid::new(Width(3), Height(1)).unwrap();
        g.remove_wall(gc(1, 0), CompassPrimary::West).unwrap();
        let graph = passage_graph(&g);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph[NodeIndex::new(2)], gc(2, 0));
        assert!(graph.find_edge(NodeIndex::new(0), NodeIndex::new(1)).is_some());
    }

    #[test]
    fn generated_mazes_are_perfect() {
        for algorithm in GeneratorAlgorithm::ALL.iter().cloned() {
            let g = new_maze(Width(23), Height(9), algorithm, 99).unwrap();
            check_perfect(&g).unwrap();
        }
    }
}

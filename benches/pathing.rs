use criterion::{
    Criterion,
    criterion_group,
    criterion_main
};
use perfect_mazes::cells::GridCoordinate;
use perfect_mazes::generators::{self, GeneratorAlgorithm};
use perfect_mazes::grid::Grid;
use perfect_mazes::pathing::{self, SolverAlgorithm};
use perfect_mazes::units::{Height, Width};

fn large_maze() -> Grid {
    generators::new_maze(Width(350), Height(350), GeneratorAlgorithm::RecursiveBacktracker, 350).unwrap()
}

fn bench_distances(c: &mut Criterion) {
    c.bench_function("distances", |b| {
        let g = large_maze();
        let start_coord = GridCoordinate::new(250, 250);
        b.iter(|| pathing::Distances::for_grid(&g, start_coord))
    });
}

fn bench_furthest_points(c: &mut Criterion) {
    c.bench_function("furthest_points", |b| {
        let g = large_maze();
        let start_coord = GridCoordinate::new(250, 250);
        let distances = pathing::Distances::for_grid(&g, start_coord).unwrap();
        b.iter(|| distances.furthest_points_on_grid())
    });
}

fn bench_solvers(c: &mut Criterion) {
    let g = large_maze();
    let (start, end) = (GridCoordinate::new(250, 250), GridCoordinate::new(0, 0));
    for algorithm in SolverAlgorithm::ALL.iter().cloned() {
        c.bench_function(&format!("solve_{}", algorithm), |b| {
            b.iter(|| algorithm.solve(&g, start, end))
        });
    }
}

criterion_group!(benches,
    bench_distances,
    bench_furthest_points,
    bench_solvers
);
criterion_main!(benches);

use pathfinder_core::{
    graph::{node_index, Graph},
    heuristic::euclidean,
    search::astar::AStar,
    search::dijkstra::Dijkstra,
    util::test_graphs::random_geometric_graph,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

fn criterion_benchmark(c: &mut Criterion) {
    // 2.5 edges per node on average
    let graphs: Vec<Graph> = [1000, 50_000, 100_000]
        .iter()
        .map(|n| random_geometric_graph(*n, (*n as f32 * 2.5) as usize, 187))
        .collect();

    let mut group = c.benchmark_group("astar_vs_dijkstra");
    let mut rng: StdRng = SeedableRng::seed_from_u64(42);
    for graph in graphs {
        let src = node_index(rng.gen_range(0..graph.num_nodes()));
        let dst = node_index(rng.gen_range(0..graph.num_nodes()));

        group.bench_with_input(
            BenchmarkId::new("Dijkstra", graph.num_nodes()),
            &graph,
            |b, g| {
                let mut dijkstra = Dijkstra::new(g);
                b.iter(|| dijkstra.search(src, dst));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("AStar", graph.num_nodes()),
            &graph,
            |b, g| {
                let table = euclidean(g, dst);
                let mut astar = AStar::new(g);
                b.iter(|| astar.search_with_table(src, dst, &table));
            },
        );
    }
    group.finish();
}

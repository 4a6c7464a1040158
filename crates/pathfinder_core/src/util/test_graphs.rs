use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    edge,
    graph::{Edge, Graph, Node},
    node,
    util::math::distance,
};

/// A, B and C, D in two clusters. The cheapest way from A to D is
/// A -> B -> D with cost 2, the detour over C costs 6.
///
/// ```text
///      B
///    /   \
///   A     D
///    \   /
///      C
/// ```
pub fn generate_diamond_graph() -> Graph {
    let mut g = Graph::new();

    let a = g.add_node(node!(0, "A", 0.0, 0.0).with_cluster("west"));
    let b = g.add_node(node!(1, "B", 1.0, 0.0).with_cluster("west"));
    let c = g.add_node(node!(2, "C", 2.0, 1.0).with_cluster("east"));
    let d = g.add_node(node!(3, "D", 2.0, 0.0).with_cluster("east"));

    g.add_edge(edge!(a, b, 1.0)); // A <=> B
    g.add_edge(edge!(b, d, 1.0)); // B <=> D
    g.add_edge(edge!(a, c, 5.0)); // A <=> C
    g.add_edge(edge!(c, d, 1.0)); // C <=> D

    g
}

pub fn generate_complex_graph() -> Graph {
    let mut graph = Graph::new();

    let a = graph.add_node(Node::new(0, 6.0, 2.0));
    let b = graph.add_node(Node::new(1, 3.0, 3.0));
    let c = graph.add_node(Node::new(2, 4.0, 6.0));
    let d = graph.add_node(Node::new(3, 2.0, 7.0));
    let e = graph.add_node(Node::new(4, 3.0, 10.0));
    let f = graph.add_node(Node::new(5, 2.0, 13.0));
    let g = graph.add_node(Node::new(6, 7.0, 15.0));
    let h = graph.add_node(Node::new(7, 5.0, 12.0));
    let i = graph.add_node(Node::new(8, 7.0, 11.0));
    let j = graph.add_node(Node::new(9, 5.0, 9.0));
    let k = graph.add_node(Node::new(10, 7.0, 7.0));

    graph.add_edge(edge!(a, b, 3.0)); // A <=> B
    graph.add_edge(edge!(a, c, 5.0)); // A <=> C
    graph.add_edge(edge!(a, k, 3.0)); // A <=> K

    graph.add_edge(edge!(b, d, 5.0)); // B <=> D
    graph.add_edge(edge!(b, c, 3.0)); // B <=> C

    graph.add_edge(edge!(c, d, 2.0)); // C <=> D
    graph.add_edge(edge!(c, j, 2.0)); // C <=> J

    graph.add_edge(edge!(d, j, 4.0)); // D <=> J
    graph.add_edge(edge!(d, e, 7.0)); // D <=> E

    graph.add_edge(edge!(e, j, 3.0)); // E <=> J
    graph.add_edge(edge!(e, f, 6.0)); // E <=> F

    graph.add_edge(edge!(f, h, 2.0)); // F <=> H
    graph.add_edge(edge!(f, g, 4.0)); // F <=> G

    graph.add_edge(edge!(g, h, 3.0)); // G <=> H
    graph.add_edge(edge!(g, i, 5.0)); // G <=> I

    graph.add_edge(edge!(h, i, 3.0)); // H <=> I
    graph.add_edge(edge!(h, j, 2.0)); // H <=> J

    graph.add_edge(edge!(i, j, 4.0)); // I <=> J
    graph.add_edge(edge!(i, k, 6.0)); // I <=> K

    graph.add_edge(edge!(j, k, 3.0)); // J <=> K

    graph
}

pub fn generate_simple_graph() -> Graph {
    //           B
    //           |
    // E -> A -> C
    //      |  /
    //      D
    let mut g = Graph::new();

    let a = g.add_node(node!(0, "A", 0.0, 0.0));
    let b = g.add_node(node!(1, "B", 0.0, 0.0));
    let c = g.add_node(node!(2, "C", 0.0, 0.0));
    let d = g.add_node(node!(3, "D", 0.0, 0.0));
    let e = g.add_node(node!(4, "E", 0.0, 0.0));

    g.add_edge(edge!(a => c, 1.0));
    g.add_edge(edge!(a => d, 1.0));
    g.add_edge(edge!(e => a, 1.0));
    g.add_edge(edge!(c, b, 1.0));
    g.add_edge(edge!(c, d, 1.0));

    g
}

/// Random nodes in the square `[0, 100)²` connected by `num_edges` random
/// edges, some of them directed. Every edge weighs at least 1.1 times the
/// distance of its end points, so the straight line distance is a
/// consistent heuristic.
pub fn random_geometric_graph(num_nodes: usize, num_edges: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut g = Graph::with_capacity(num_nodes, 2 * num_edges);

    let mut coords = Vec::with_capacity(num_nodes);
    for id in 0..num_nodes {
        let (x, y) = (rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0));
        coords.push([x, y]);
        g.add_node(Node::new(id, x, y));
    }

    if num_nodes == 0 {
        return g;
    }

    for _ in 0..num_edges {
        let (source, target) = (rng.gen_range(0..num_nodes), rng.gen_range(0..num_nodes));
        let weight = distance(coords[source], coords[target]) * rng.gen_range(1.1..2.0);

        if rng.gen_bool(0.3) {
            g.add_edge(Edge::new(source.into(), target.into(), weight));
        } else {
            g.add_edge(Edge::new_bidir(source.into(), target.into(), weight));
        }
    }

    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_graphs_are_reproducible() {
        let g1 = random_geometric_graph(20, 40, 7);
        let g2 = random_geometric_graph(20, 40, 7);

        assert_eq!(g1.num_nodes(), 20);
        assert_eq!(g1.num_arcs(), g2.num_arcs());
        assert!(g1.edges().zip(g2.edges()).all(|(a, b)| a == b));
    }
}

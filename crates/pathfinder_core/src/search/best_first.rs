//! Best-first search shared by Dijkstra and A*.
//!
//! The queue uses lazy deletion: a relaxation pushes a new entry instead of
//! updating the old one, and entries of already closed nodes are dropped when
//! they are popped. Entries with the same estimate are popped in insertion
//! order (FIFO), which decides between equally cheap paths.
use std::{cmp::Ordering, collections::BinaryHeap};

use log::{debug, info, warn};

use crate::{
    constants::Weight,
    error::{Inconsistency, SearchError},
    graph::{Graph, NodeIndex},
    statistics::SearchStats,
};

use super::shortest_path::ShortestPath;

#[derive(Debug)]
pub(crate) struct Candidate {
    pub(crate) node: NodeIndex,
    pub(crate) estimated_weight: Weight,
    seq: usize,
}

impl Candidate {
    pub(crate) fn new(node: NodeIndex, estimated_weight: Weight, seq: usize) -> Self {
        Self {
            node,
            estimated_weight,
            seq,
        }
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl Ord for Candidate {
    // BinaryHeap is a max heap, so both keys are reversed. NaN estimates
    // sort after every finite one.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimated_weight
            .total_cmp(&self.estimated_weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Parameters of a search run
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchParams {
    // Stop after this many expansions
    pub(crate) expansion_limit: Option<usize>,
    // Treat a cheaper route to a closed node as an error
    pub(crate) fail_on_inconsistency: bool,
}

impl SearchParams {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn expansion_limit(mut self, limit: usize) -> Self {
        self.expansion_limit = Some(limit);
        self
    }

    pub fn fail_on_inconsistency(mut self, fail: bool) -> Self {
        self.fail_on_inconsistency = fail;
        self
    }
}

/// Bookkeeping of one search run, one entry per node slot.
struct SearchState {
    g_cost: Vec<Weight>,
    f_cost: Vec<Weight>,
    parents: Vec<Option<NodeIndex>>,
    closed: Vec<bool>,
}

impl SearchState {
    fn new(num_nodes: usize) -> Self {
        SearchState {
            g_cost: vec![Weight::INFINITY; num_nodes],
            f_cost: vec![Weight::INFINITY; num_nodes],
            parents: vec![None; num_nodes],
            closed: vec![false; num_nodes],
        }
    }
}

/// Best-first search over a borrowed graph. The graph is only read, so any
/// number of searches may run on the same graph at once, each with its own
/// `BestFirstSearch`.
pub struct BestFirstSearch<'a> {
    pub stats: SearchStats,
    params: SearchParams,
    g: &'a Graph,
}

impl<'a> BestFirstSearch<'a> {
    pub fn new(g: &'a Graph) -> Self {
        Self::with_params(g, SearchParams::default())
    }

    pub fn with_params(g: &'a Graph, params: SearchParams) -> Self {
        BestFirstSearch {
            stats: SearchStats::default(),
            params,
            g,
        }
    }

    pub fn graph(&self) -> &'a Graph {
        self.g
    }

    /// Searches a path from `source` to `target`, ordering the queue by
    /// `g + heuristic(node)`. The heuristic must be non-negative and should
    /// be 0 at the target. A heuristic that is 0 everywhere gives Dijkstra.
    ///
    /// Returns `Ok(None)` if the target cannot be reached (or the expansion
    /// limit was hit). The returned path is only guaranteed to be optimal for
    /// admissible heuristics.
    pub fn search(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        heuristic: impl Fn(NodeIndex) -> Weight,
    ) -> Result<Option<ShortestPath>, SearchError> {
        info!("BEGIN SEARCH from {:?} to {:?}", source, target);
        self.stats.init();

        for node in [source, target] {
            if !self.g.contains(node) {
                self.stats.finish();
                return Err(SearchError::UnknownNode(node));
            }
        }

        let mut state = SearchState::new(self.g.num_nodes());
        let mut queue = BinaryHeap::new();
        let mut seq = 0;

        state.g_cost[source.index()] = 0.0;
        state.f_cost[source.index()] = heuristic(source);
        queue.push(Candidate::new(source, state.f_cost[source.index()], seq));

        let mut reached = false;

        loop {
            self.stats.observe_queue_len(queue.len());
            let Some(Candidate { node, .. }) = queue.pop() else {
                break;
            };

            if state.closed[node.index()] {
                self.stats.stale_pops += 1;
                continue;
            }

            if let Some(limit) = self.params.expansion_limit {
                if self.stats.nodes_settled >= limit {
                    self.stats.limit_reached = true;
                    break;
                }
            }

            state.closed[node.index()] = true;
            self.stats.nodes_settled += 1;

            if node == target {
                reached = true;
                break;
            }

            let real_weight = state.g_cost[node.index()];

            for (_, edge) in self.g.neighbors_outgoing(node) {
                let next = edge.target.index();
                let tentative_weight = real_weight + edge.weight;

                if state.closed[next] {
                    if tentative_weight < state.g_cost[next] {
                        self.stats.closed_improvements += 1;
                        let inconsistency = Inconsistency::ClosedNodeImproved {
                            node: edge.target,
                            settled: state.g_cost[next],
                            found: tentative_weight,
                        };
                        if self.params.fail_on_inconsistency {
                            self.stats.finish();
                            return Err(inconsistency.into());
                        }
                        warn!("{}", inconsistency);
                    }
                    continue;
                }

                if tentative_weight < state.g_cost[next] {
                    state.g_cost[next] = tentative_weight;
                    state.parents[next] = Some(node);
                    state.f_cost[next] = tentative_weight + heuristic(edge.target);

                    seq += 1;
                    queue.push(Candidate::new(edge.target, state.f_cost[next], seq));
                    self.stats.relaxations += 1;
                }
            }
        }

        self.stats.finish();

        if !reached {
            info!(
                "No path found: {:?}/{} nodes settled",
                self.stats.duration.unwrap_or_default(),
                self.stats.nodes_settled
            );
            return Ok(None);
        }

        let nodes = super::reconstruct_path(&state.parents, source, target)?;

        let settled = super::verify_cost(self.g, &nodes, state.g_cost[target.index()])?;

        self.stats.path_weight = Some(settled);
        let sp = ShortestPath::new(nodes, settled);
        debug!("Path found: {:?}", sp);
        info!("{}, weight: {}", self.stats, sp.weight);

        Ok(Some(sp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        edge,
        graph::{node_index, Node},
        search::{assert_no_path, assert_path},
        util::test_graphs::generate_diamond_graph,
    };

    fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn null_heuristic(_: NodeIndex) -> Weight {
        0.0
    }

    #[test]
    fn candidates_pop_lowest_estimate_first() {
        let mut queue = BinaryHeap::new();
        queue.push(Candidate::new(node_index(0), 3.0, 0));
        queue.push(Candidate::new(node_index(1), 1.0, 1));
        queue.push(Candidate::new(node_index(2), 2.0, 2));

        let order: Vec<_> = std::iter::from_fn(|| queue.pop().map(|c| c.node.index())).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn ties_are_popped_fifo() {
        let mut queue = BinaryHeap::new();
        for (seq, node) in [4, 2, 7, 1].into_iter().enumerate() {
            queue.push(Candidate::new(node_index(node), 5.0, seq));
        }

        let order: Vec<_> = std::iter::from_fn(|| queue.pop().map(|c| c.node.index())).collect();
        assert_eq!(order, vec![4, 2, 7, 1]);
    }

    #[test]
    fn nan_estimates_keep_a_total_order() {
        let mut queue = BinaryHeap::new();
        queue.push(Candidate::new(node_index(0), f64::NAN, 0));
        queue.push(Candidate::new(node_index(1), 2.0, 1));
        queue.push(Candidate::new(node_index(2), f64::NAN, 2));
        queue.push(Candidate::new(node_index(3), 1.0, 3));

        let order: Vec<_> = std::iter::from_fn(|| queue.pop().map(|c| c.node.index())).collect();
        assert_eq!(order, vec![3, 1, 0, 2]);
    }

    #[test]
    fn equal_cost_paths_follow_insertion_order() {
        //   1
        //  / \
        // 0   3
        //  \ /
        //   2
        let mut g = Graph::new();
        g.add_edge(edge!(0 => 1, 1.0));
        g.add_edge(edge!(0 => 2, 1.0));
        g.add_edge(edge!(1 => 3, 1.0));
        g.add_edge(edge!(2 => 3, 1.0));

        let mut search = BestFirstSearch::new(&g);
        // 1 is discovered first and expanded first, so it becomes the parent of 3
        assert_path(vec![0, 1, 3], 2.0, search.search(0.into(), 3.into(), null_heuristic));
    }

    #[test]
    fn unknown_nodes() {
        let g = generate_diamond_graph();
        let mut search = BestFirstSearch::new(&g);

        assert_eq!(
            search.search(node_index(0), node_index(17), null_heuristic),
            Err(SearchError::UnknownNode(node_index(17)))
        );
        assert_eq!(
            search.search(node_index(9), node_index(0), null_heuristic),
            Err(SearchError::UnknownNode(node_index(9)))
        );
        assert_eq!(search.stats.nodes_settled, 0);
    }

    #[test]
    fn diamond_dijkstra() {
        init_log();
        let g = generate_diamond_graph();
        let (a, d) = (g.id_for("A").unwrap(), g.id_for("D").unwrap());

        let mut search = BestFirstSearch::new(&g);
        let sp = search.search(a, d, null_heuristic).unwrap().unwrap();

        let names: Vec<_> = sp.nodes.iter().map(|n| g.label(*n)).collect();
        assert_eq!(names, vec!["A", "B", "D"]);
        assert_eq!(sp.weight, 2.0);
    }

    #[test]
    fn diamond_with_inadmissible_heuristic_terminates() {
        init_log();
        let g = generate_diamond_graph();
        let (a, c, d) = (
            g.id_for("A").unwrap(),
            g.id_for("C").unwrap(),
            g.id_for("D").unwrap(),
        );

        let mut search = BestFirstSearch::new(&g);
        let sp = search
            .search(a, d, |n| if n == c { 100.0 } else { 0.0 })
            .unwrap()
            .unwrap();

        assert_eq!(sp.nodes.first(), Some(&a));
        assert_eq!(sp.nodes.last(), Some(&d));
        assert_eq!(super::super::path_cost(&g, &sp.nodes), Some(sp.weight));
    }

    #[test]
    fn start_equals_goal() {
        let g = generate_diamond_graph();
        let mut search = BestFirstSearch::new(&g);

        assert_path(vec![2], 0.0, search.search(2.into(), 2.into(), |_| 7.0));
        assert_eq!(search.stats.nodes_settled, 1);
        assert_eq!(search.stats.relaxations, 0);
    }

    #[test]
    fn disconnected_goal_settles_reachable_component() {
        // 0 -> 1 -> 2
        // 3 -> 4 -> 5
        let mut g = Graph::new();
        for i in 0..6 {
            g.add_node(Node::new(i, 0.0, 0.0));
        }
        g.add_edge(edge!(0 => 1, 1.0));
        g.add_edge(edge!(1 => 2, 1.0));
        g.add_edge(edge!(3 => 4, 3.0));
        g.add_edge(edge!(4 => 5, 1.0));

        let mut search = BestFirstSearch::new(&g);

        assert_no_path(search.search(0.into(), 3.into(), null_heuristic));
        assert_eq!(search.stats.nodes_settled, 3);
        assert_eq!(search.stats.path_weight, None);

        assert_no_path(search.search(5.into(), 3.into(), null_heuristic));
        assert_eq!(search.stats.nodes_settled, 1);
    }

    #[test]
    fn self_loop_is_never_taken() {
        let mut g = generate_diamond_graph();
        let a = g.id_for("A").unwrap();
        let d = g.id_for("D").unwrap();
        g.add_edge(edge!(a => a, 3.0));
        g.add_edge(edge!(a => a, 0.0));

        let mut search = BestFirstSearch::new(&g);
        let sp = search.search(a, d, null_heuristic).unwrap().unwrap();

        assert_eq!(sp.weight, 2.0);
        assert_eq!(sp.nodes.iter().filter(|n| **n == a).count(), 1);
        assert_eq!(search.stats.closed_improvements, 0);
    }

    #[test]
    fn stale_queue_entries_are_skipped() {
        // 0 -> 2 is found first with 10, then improved via 1
        let mut g = Graph::new();
        g.add_edge(edge!(0 => 2, 10.0));
        g.add_edge(edge!(0 => 1, 1.0));
        g.add_edge(edge!(1 => 2, 1.0));
        g.add_edge(edge!(2 => 3, 1.0));
        g.add_edge(edge!(3 => 4, 100.0));
        g.add_node(Node::new(5, 0.0, 0.0));

        let mut search = BestFirstSearch::new(&g);
        assert_no_path(search.search(0.into(), 5.into(), null_heuristic));

        assert_eq!(search.stats.nodes_settled, 5);
        assert_eq!(search.stats.stale_pops, 1);
        assert_eq!(search.stats.relaxations, 5);
    }

    /// S -> A costs 3, S -> B -> A costs 2. h(B) = 5 is admissible but not
    /// consistent, so A is closed before the cheaper route via B is known.
    fn inconsistent_setup() -> (Graph, impl Fn(NodeIndex) -> Weight) {
        let mut g = Graph::new();
        g.add_edge(edge!(0 => 1, 3.0)); // S -> A
        g.add_edge(edge!(0 => 2, 1.0)); // S -> B
        g.add_edge(edge!(2 => 1, 1.0)); // B -> A
        g.add_edge(edge!(1 => 3, 10.0)); // A -> G
        (g, |n: NodeIndex| if n.index() == 2 { 5.0 } else { 0.0 })
    }

    #[test]
    fn inconsistent_heuristic_is_reported() {
        init_log();
        let (g, h) = inconsistent_setup();

        let mut search = BestFirstSearch::new(&g);
        // optimal would be [0, 2, 1, 3] with 12
        assert_path(vec![0, 1, 3], 13.0, search.search(0.into(), 3.into(), &h));
        assert_eq!(search.stats.closed_improvements, 1);

        let mut strict = BestFirstSearch::with_params(&g, SearchParams::new().fail_on_inconsistency(true));
        assert_eq!(
            strict.search(0.into(), 3.into(), &h),
            Err(Inconsistency::ClosedNodeImproved {
                node: node_index(1),
                settled: 3.0,
                found: 2.0
            }
            .into())
        );
    }

    #[test]
    fn expansion_limit() {
        let mut g = Graph::new();
        for i in 0..10 {
            g.add_edge(edge!(i => i + 1, 1.0));
        }

        let mut search = BestFirstSearch::with_params(&g, SearchParams::new().expansion_limit(4));
        assert_no_path(search.search(0.into(), 10.into(), null_heuristic));
        assert!(search.stats.limit_reached);
        assert_eq!(search.stats.nodes_settled, 4);

        assert_path(vec![0, 1, 2, 3], 3.0, search.search(0.into(), 3.into(), null_heuristic));
        assert!(!search.stats.limit_reached);
    }

    #[test]
    fn peak_queue_length() {
        // star with 4 leaves, the queue holds all leaves at once
        let mut g = Graph::new();
        for leaf in 1..=4 {
            g.add_edge(edge!(0 => leaf, leaf as f64));
        }
        g.add_node(Node::new(5, 0.0, 0.0));

        let mut search = BestFirstSearch::new(&g);
        assert_no_path(search.search(0.into(), 5.into(), null_heuristic));

        assert_eq!(search.stats.max_queue_len, 4);
        assert_eq!(search.stats.nodes_settled, 5);
    }
}

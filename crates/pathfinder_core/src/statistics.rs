use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use histogram::Histogram;

use crate::{constants::Weight, graph::Graph};

/// Cost of a single search run. Reset by `init` at the start of every search
/// and only read after `finish`.
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Number of expansions, i.e. nodes taken from the queue and closed
    pub nodes_settled: usize,
    /// Largest queue length observed right before a pop
    pub max_queue_len: usize,
    /// Successful relaxations, each one pushes a queue entry
    pub relaxations: usize,
    /// Queue entries discarded because their node was already closed
    pub stale_pops: usize,
    /// Closed nodes that were reached again with a lower cost. Always 0 for
    /// consistent heuristics.
    pub closed_improvements: usize,
    /// Set if the search stopped because of the expansion limit
    pub limit_reached: bool,
    /// Cost of the found path, `None` if the target was not reached
    pub path_weight: Option<Weight>,
    pub duration: Option<Duration>,
    start_time: Option<Instant>,
}

impl SearchStats {
    pub fn init(&mut self) {
        *self = SearchStats::default();
        self.start_timer();
    }

    fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn finish(&mut self) {
        if let Some(start_time) = self.start_time {
            self.duration = Some(start_time.elapsed());
        }
    }

    pub(crate) fn observe_queue_len(&mut self, len: usize) {
        self.max_queue_len = self.max_queue_len.max(len);
    }

    /// Elapsed search time in milliseconds, 0 if the search has not finished.
    pub fn millis(&self) -> f64 {
        self.duration
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or_default()
    }
}

impl Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Stats: {} nodes settled, max queue {} in {:?}",
            self.nodes_settled, self.max_queue_len, self.duration
        )
    }
}

fn degree_histogram(g: &Graph, outgoing: bool) -> Histogram {
    let hist = Histogram::new(0, 10, 30).unwrap();
    let adjacency = if outgoing { &g.edges_out } else { &g.edges_in };
    for arcs in adjacency {
        hist.increment(arcs.len() as u64, 1).unwrap();
    }
    hist
}

pub fn degree_out_hist(g: &Graph) -> Histogram {
    degree_histogram(g, true)
}

pub fn degree_in_hist(g: &Graph) -> Histogram {
    degree_histogram(g, false)
}

fn average_degree(g: &Graph, outgoing: bool) -> f64 {
    let num_nodes = g.nodes().count();
    if num_nodes == 0 {
        return 0.0;
    }
    let adjacency = if outgoing { &g.edges_out } else { &g.edges_in };
    let sum: usize = adjacency.iter().map(Vec::len).sum();
    sum as f64 / num_nodes as f64
}

pub fn average_in_degree(g: &Graph) -> f64 {
    average_degree(g, false)
}

pub fn average_out_degree(g: &Graph) -> f64 {
    average_degree(g, true)
}

/// One line per non-empty histogram bucket, `[low-high]: count`.
pub fn format_hist(hist: Histogram) -> String {
    let mut res = String::new();
    for bucket in hist.into_iter().filter(|b| b.count() > 0) {
        res.push_str(&format!(
            "[{}-{}]: {}\n",
            bucket.low(),
            bucket.high(),
            bucket.count()
        ));
    }
    res
}

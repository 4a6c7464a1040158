//! Runs A* with several heuristics on the same query and compares each run
//! with Dijkstra.
use std::{fmt, thread};

use log::{debug, warn};
use serde::Serialize;

use crate::{
    constants::{Weight, AUDIT_TOLERANCE},
    error::SearchError,
    graph::{Graph, NodeIndex},
    heuristic::HeuristicTable,
    search::{astar::AStar, dijkstra::Dijkstra, shortest_path::ShortestPath},
    statistics::SearchStats,
};

pub const BASELINE_LABEL: &str = "dijkstra";

/// One search of a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub label: String,
    pub source: usize,
    pub target: usize,
    /// Empty if the target was not reached
    pub cost: Option<Weight>,
    pub hops: Option<usize>,
    pub nodes_settled: usize,
    pub max_queue_len: usize,
    pub closed_improvements: usize,
    pub duration_ms: f64,
    /// Same cost as Dijkstra
    pub optimal: bool,
    /// `cost / dijkstra cost`
    pub cost_ratio: Option<Weight>,
}

impl ComparisonRow {
    fn new(
        label: &str,
        source: NodeIndex,
        target: NodeIndex,
        sp: Option<&ShortestPath>,
        stats: &SearchStats,
        baseline: Option<Weight>,
    ) -> Self {
        let cost = sp.map(|sp| sp.weight);
        ComparisonRow {
            label: label.to_string(),
            source: source.index(),
            target: target.index(),
            cost,
            hops: sp.map(ShortestPath::hops),
            nodes_settled: stats.nodes_settled,
            max_queue_len: stats.max_queue_len,
            closed_improvements: stats.closed_improvements,
            duration_ms: stats.millis(),
            optimal: same_cost(cost, baseline),
            cost_ratio: cost_ratio(cost, baseline),
        }
    }
}

impl fmt::Display for ComparisonRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cost = match self.cost {
            Some(cost) => format!("{:.3}", cost),
            None => "unreachable".to_string(),
        };
        write!(
            f,
            "{:<12} Cost: {:>11} | Expanded: {:>7} | Max fringe: {:>7} | Runtime: {:.3} ms{}",
            self.label,
            cost,
            self.nodes_settled,
            self.max_queue_len,
            self.duration_ms,
            if self.optimal { "" } else { " | SUBOPTIMAL" }
        )
    }
}

fn same_cost(cost: Option<Weight>, baseline: Option<Weight>) -> bool {
    match (cost, baseline) {
        (Some(cost), Some(baseline)) => {
            (cost - baseline).abs() <= AUDIT_TOLERANCE * (1.0 + baseline.abs())
        }
        (None, None) => true,
        _ => false,
    }
}

fn cost_ratio(cost: Option<Weight>, baseline: Option<Weight>) -> Option<Weight> {
    match (cost?, baseline?) {
        (cost, baseline) if baseline > 0.0 => Some(cost / baseline),
        (cost, _) if cost == 0.0 => Some(1.0),
        _ => None,
    }
}

fn baseline_row(
    g: &Graph,
    source: NodeIndex,
    target: NodeIndex,
) -> Result<ComparisonRow, SearchError> {
    let mut dijkstra = Dijkstra::new(g);
    let sp = dijkstra.search(source, target)?;
    let cost = sp.as_ref().map(|sp| sp.weight);
    Ok(ComparisonRow::new(
        BASELINE_LABEL,
        source,
        target,
        sp.as_ref(),
        dijkstra.stats(),
        cost,
    ))
}

fn astar_row(
    g: &Graph,
    source: NodeIndex,
    target: NodeIndex,
    label: &str,
    table: &HeuristicTable,
    baseline: Option<Weight>,
) -> Result<ComparisonRow, SearchError> {
    let mut astar = AStar::new(g);
    let sp = astar.search_with_table(source, target, table)?;
    let row = ComparisonRow::new(label, source, target, sp.as_ref(), astar.stats(), baseline);
    if !row.optimal {
        warn!(
            "{}: cost {:?} differs from Dijkstra {:?} for {} -> {}",
            label, row.cost, baseline, source, target
        );
    }
    Ok(row)
}

/// Runs Dijkstra followed by A* with every labelled table. The first row is
/// always the Dijkstra run.
pub fn compare_heuristics(
    g: &Graph,
    source: NodeIndex,
    target: NodeIndex,
    candidates: &[(&str, &HeuristicTable)],
) -> Result<Vec<ComparisonRow>, SearchError> {
    let baseline = baseline_row(g, source, target)?;
    let cost = baseline.cost;

    let mut rows = vec![baseline];
    for (label, table) in candidates {
        rows.push(astar_row(g, source, target, label, table, cost)?);
    }

    debug!("Compared {} heuristics", candidates.len());
    Ok(rows)
}

/// Same as [`compare_heuristics`], but every A* search runs on its own thread.
/// The rows keep the order of `candidates`.
pub fn compare_heuristics_par(
    g: &Graph,
    source: NodeIndex,
    target: NodeIndex,
    candidates: &[(&str, &HeuristicTable)],
) -> Result<Vec<ComparisonRow>, SearchError> {
    let baseline = baseline_row(g, source, target)?;
    let cost = baseline.cost;

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = candidates
            .iter()
            .map(|(label, table)| s.spawn(move || astar_row(g, source, target, label, table, cost)))
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|err| std::panic::resume_unwind(err)))
            .collect()
    });

    let mut rows = vec![baseline];
    for row in results {
        rows.push(row?);
    }
    Ok(rows)
}

/// Aggregate over many queries for one label
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub label: String,
    pub queries: usize,
    pub suboptimal: usize,
    pub avg_nodes_settled: f64,
    pub avg_duration_ms: f64,
    pub max_cost_ratio: Weight,
}

impl ComparisonSummary {
    /// Groups `rows` by label, keeping the order in which labels first appear.
    pub fn from_rows(rows: &[ComparisonRow]) -> Vec<ComparisonSummary> {
        let mut summaries: Vec<ComparisonSummary> = Vec::new();

        for row in rows {
            let idx = match summaries.iter().position(|s| s.label == row.label) {
                Some(idx) => idx,
                None => {
                    summaries.push(ComparisonSummary {
                        label: row.label.clone(),
                        ..Default::default()
                    });
                    summaries.len() - 1
                }
            };
            let summary = &mut summaries[idx];

            summary.queries += 1;
            if !row.optimal {
                summary.suboptimal += 1;
            }
            summary.avg_nodes_settled += row.nodes_settled as f64;
            summary.avg_duration_ms += row.duration_ms;
            if let Some(ratio) = row.cost_ratio {
                summary.max_cost_ratio = summary.max_cost_ratio.max(ratio);
            }
        }

        for summary in summaries.iter_mut() {
            summary.avg_nodes_settled /= summary.queries as f64;
            summary.avg_duration_ms /= summary.queries as f64;
        }

        summaries
    }
}

impl fmt::Display for ComparisonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} Queries: {:>5} | Suboptimal: {:>5} | Avg expanded: {:>10.1} | Avg runtime: {:.3} ms | Max cost ratio: {:.3}",
            self.label,
            self.queries,
            self.suboptimal,
            self.avg_nodes_settled,
            self.avg_duration_ms,
            self.max_cost_ratio
        )
    }
}

use std::fs::File;

use anyhow::Context;
use indicatif::ProgressBar;
use log::info;
use pathfinder_core::{
    heuristic::{HeuristicColumn, HeuristicTable},
    prelude::*,
    search::compare::ComparisonSummary,
    util::cli::{self, Queries},
};
use rand::prelude::*;

/// Heuristic tables for one goal, labelled for the output
fn tables_for(
    g: &Graph,
    goal: NodeIndex,
    multiplier: f64,
    loaded: &[(&str, HeuristicTable)],
) -> Vec<(String, HeuristicTable)> {
    let mut tables = vec![
        ("euclidean".to_string(), euclidean(g, goal)),
        ("cluster".to_string(), cluster_inflated(g, goal, multiplier)),
    ];
    tables.extend(
        loaded
            .iter()
            .map(|(label, table)| (label.to_string(), table.clone())),
    );
    tables
}

fn run_query(
    g: &Graph,
    source: NodeIndex,
    target: NodeIndex,
    multiplier: f64,
    loaded: &[(&str, HeuristicTable)],
) -> anyhow::Result<Vec<ComparisonRow>> {
    let tables = tables_for(g, target, multiplier, loaded);
    let candidates: Vec<_> = tables
        .iter()
        .map(|(label, table)| (label.as_str(), table))
        .collect();

    compare_heuristics_par(g, source, target, &candidates)
        .with_context(|| format!("Comparison {} -> {} failed", source, target))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cfg = cli::parse_compare();
    let g = cfg.graph.load()?;
    info!("{}", g.info());

    // Loaded tables belong to one goal, so they only make sense for single queries
    let mut loaded = Vec::new();
    if let (Some(path), Queries::Single { .. }) = (&cfg.heuristics, &cfg.queries) {
        loaded.push(("file", HeuristicTable::from_csv(path, &g, HeuristicColumn::Primary)?));
        loaded.push((
            "file_inadm",
            HeuristicTable::from_csv(path, &g, HeuristicColumn::Secondary)?,
        ));
    }

    let mut rows = Vec::new();
    match &cfg.queries {
        Queries::Single { from, to } => {
            let source = g.resolve(from).with_context(|| format!("Unknown start {:?}", from))?;
            let target = g.resolve(to).with_context(|| format!("Unknown goal {:?}", to))?;

            rows = run_query(&g, source, target, cfg.multiplier, &loaded)?;
            for row in &rows {
                println!("{}", row);
            }
        }
        Queries::Random { count, seed } => {
            anyhow::ensure!(g.num_nodes() > 0, "Graph has no nodes");
            let mut rng: StdRng = SeedableRng::seed_from_u64(*seed);

            let pb = ProgressBar::new(*count as u64);
            for _ in 0..*count {
                let source = node_index(rng.gen_range(0..g.num_nodes()));
                let target = node_index(rng.gen_range(0..g.num_nodes()));

                rows.extend(run_query(&g, source, target, cfg.multiplier, &loaded)?);
                pb.inc(1);
            }
            pb.finish_with_message("Comparison finished.");

            for summary in ComparisonSummary::from_rows(&rows) {
                println!("{}", summary);
            }
        }
    }

    if let Some(out) = &cfg.out {
        let file = File::create(out).with_context(|| format!("Could not create {:?}", out))?;
        let mut writer = csv::Writer::from_writer(file);
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        info!("Wrote {} rows to {:?}", rows.len(), out);
    }

    Ok(())
}

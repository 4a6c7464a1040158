use anyhow::Context;
use log::info;
use pathfinder_core::{
    heuristic::{euclidean, HeuristicTable},
    prelude::*,
    util::cli::{self, HeuristicSource},
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cfg = cli::parse_route();
    let g = cfg.graph.load()?;
    info!("{}", g.info());

    let source = g
        .resolve(&cfg.from)
        .with_context(|| format!("Unknown start {:?}", cfg.from))?;
    let target = g
        .resolve(&cfg.to)
        .with_context(|| format!("Unknown goal {:?}", cfg.to))?;

    let table = match &cfg.heuristic {
        HeuristicSource::Zero => HeuristicTable::new(),
        HeuristicSource::Euclidean => euclidean(&g, target),
        HeuristicSource::Table { path, column } => HeuristicTable::from_csv(path, &g, *column)?,
    };

    let mut astar = AStar::with_params(&g, cfg.params);
    let sp = astar.search_with_table(source, target, &table)?;

    println!("{}", SearchReport::new(&g, sp.as_ref(), astar.stats()));

    Ok(())
}

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser};

use crate::{
    constants::{Weight, CROSS_CLUSTER_MULTIPLIER},
    graph::Graph,
    heuristic::HeuristicColumn,
    search::best_first::SearchParams,
};

/// Where the graph is read from
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Path to the node csv file (id,name,x,y[,cluster])
    #[arg(long, value_name = "FILE")]
    pub nodes: Option<PathBuf>,

    /// Path to the edge csv file (from,to,weight[,directed])
    #[arg(long, value_name = "FILE")]
    pub edges: PathBuf,
}

impl GraphArgs {
    /// Reads the graph, only the edge file is required.
    pub fn load(&self) -> anyhow::Result<Graph> {
        let g = match &self.nodes {
            Some(nodes) => Graph::from_csv(nodes, &self.edges),
            None => Graph::from_edges_csv(&self.edges),
        };
        g.with_context(|| format!("Failed to load graph from {:?}", self.edges))
    }
}

#[derive(Parser)]
#[command(author = "Daniel Holzner", version, about = "Find a shortest path with Dijkstra or A*", long_about = None)]
struct RouteCli {
    #[command(flatten)]
    graph: GraphArgs,

    /// Start node, given by name or id
    #[arg(short, long)]
    from: String,

    /// Goal node, given by name or id
    #[arg(short, long)]
    to: String,

    /// Heuristic csv file (node,value[,inadmissible_value])
    #[arg(long, value_name = "FILE", conflicts_with = "euclidean")]
    heuristics: Option<PathBuf>,

    /// Use the inadmissible column of the heuristic file
    #[arg(long, requires = "heuristics")]
    inadmissible: bool,

    /// Use the straight line distance as heuristic
    #[arg(long)]
    euclidean: bool,

    /// Ignore all heuristics
    #[arg(long, conflicts_with_all = ["heuristics", "euclidean"])]
    dijkstra: bool,

    /// Stop after expanding this many nodes
    #[arg(long, value_name = "n")]
    limit: Option<usize>,

    /// Fail if a closed node is reached on a cheaper path
    #[arg(long)]
    strict: bool,
}

/// Heuristic used by a single search
#[derive(Debug, Clone, PartialEq)]
pub enum HeuristicSource {
    Zero,
    Euclidean,
    Table {
        path: PathBuf,
        column: HeuristicColumn,
    },
}

#[derive(Debug, Clone)]
pub struct RouteCfg {
    pub graph: GraphArgs,
    pub from: String,
    pub to: String,
    pub heuristic: HeuristicSource,
    pub params: SearchParams,
}

pub fn parse_route() -> RouteCfg {
    let cli = RouteCli::parse();

    let heuristic = match (cli.heuristics, cli.euclidean) {
        (Some(path), _) => HeuristicSource::Table {
            path,
            column: if cli.inadmissible {
                HeuristicColumn::Secondary
            } else {
                HeuristicColumn::Primary
            },
        },
        (None, true) => HeuristicSource::Euclidean,
        (None, false) => HeuristicSource::Zero,
    };

    let mut params = SearchParams::new().fail_on_inconsistency(cli.strict);
    if let Some(limit) = cli.limit {
        params = params.expansion_limit(limit);
    }

    RouteCfg {
        graph: cli.graph,
        from: cli.from,
        to: cli.to,
        heuristic,
        params,
    }
}

#[derive(Parser)]
#[command(author = "Daniel Holzner", version, about = "Compare heuristics against Dijkstra", long_about = None)]
struct CompareCli {
    #[command(flatten)]
    graph: GraphArgs,

    /// Start node, given by name or id
    #[arg(short, long, requires = "to", conflicts_with = "random")]
    from: Option<String>,

    /// Goal node, given by name or id
    #[arg(short, long, requires = "from")]
    to: Option<String>,

    /// Run this many random queries instead of a single one
    #[arg(short, long, value_name = "n")]
    random: Option<usize>,

    /// Seed for the random queries
    #[arg(long, default_value_t = 187)]
    seed: u64,

    /// Factor for estimates across clusters
    #[arg(short, long, default_value_t = CROSS_CLUSTER_MULTIPLIER)]
    multiplier: Weight,

    /// Additional heuristic csv file, both of its columns are compared
    #[arg(long, value_name = "FILE")]
    heuristics: Option<PathBuf>,

    /// Write all rows to this csv file
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,
}

/// Which queries the comparison runs
#[derive(Debug, Clone, PartialEq)]
pub enum Queries {
    Single { from: String, to: String },
    Random { count: usize, seed: u64 },
}

#[derive(Debug, Clone)]
pub struct CompareCfg {
    pub graph: GraphArgs,
    pub queries: Queries,
    pub multiplier: Weight,
    pub heuristics: Option<PathBuf>,
    pub out: Option<PathBuf>,
}

pub fn parse_compare() -> CompareCfg {
    let cli = CompareCli::parse();

    let queries = match (cli.from, cli.to, cli.random) {
        (Some(from), Some(to), _) => Queries::Single { from, to },
        (_, _, Some(count)) => Queries::Random {
            count,
            seed: cli.seed,
        },
        _ => Queries::Random {
            count: 100,
            seed: cli.seed,
        },
    };

    CompareCfg {
        graph: cli.graph,
        queries,
        multiplier: cli.multiplier,
        heuristics: cli.heuristics,
        out: cli.out,
    }
}

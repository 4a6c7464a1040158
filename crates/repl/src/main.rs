//! Interactive shell to run searches on a graph loaded from csv files.
use std::path::{Path, PathBuf};

use log::info;
use pathfinder_core::{
    graph::{Graph, NodeIndex},
    heuristic::{cluster_inflated, euclidean},
    search::{
        astar::AStar,
        compare::compare_heuristics,
        dijkstra::Dijkstra,
        report::SearchReport,
    },
    statistics::{
        average_in_degree, average_out_degree, degree_in_hist, degree_out_hist, format_hist,
    },
    util::test_graphs::generate_diamond_graph,
};
use reedline_repl_rs::clap::{value_parser, Arg, ArgMatches, Command};
use reedline_repl_rs::{Repl, Result};

/// Resolves the node argument `name` given by name or id.
fn node_arg(args: &ArgMatches, name: &str, g: &Graph) -> std::result::Result<NodeIndex, String> {
    let token = args
        .get_one::<String>(name)
        .ok_or_else(|| format!("Missing argument <{}>", name))?;
    g.resolve(token).map_err(|err| err.to_string())
}

fn node_args(args: &ArgMatches, g: &Graph) -> std::result::Result<(NodeIndex, NodeIndex), String> {
    Ok((node_arg(args, "src", g)?, node_arg(args, "dst", g)?))
}

/// Print graph info
fn info(_args: ArgMatches, context: &mut Context) -> Result<Option<String>> {
    let g = &context.graph;
    Ok(Some(format!(
        "{}\nAverage degree: out {:.2}, in {:.2}\nOut degrees:\n{}In degrees:\n{}",
        g.info(),
        average_out_degree(g),
        average_in_degree(g),
        format_hist(degree_out_hist(g)),
        format_hist(degree_in_hist(g))
    )))
}

fn run_dijkstra(args: ArgMatches, context: &mut Context) -> Result<Option<String>> {
    let g = &context.graph;
    let (src, dst) = match node_args(&args, g) {
        Ok(nodes) => nodes,
        Err(err) => return Ok(Some(err)),
    };

    let mut dijkstra = Dijkstra::new(g);
    match dijkstra.search(src, dst) {
        Ok(sp) => Ok(Some(
            SearchReport::new(g, sp.as_ref(), dijkstra.stats()).to_string(),
        )),
        Err(err) => Ok(Some(format!("Search failed: {}", err))),
    }
}

fn run_astar(args: ArgMatches, context: &mut Context) -> Result<Option<String>> {
    let g = &context.graph;
    let (src, dst) = match node_args(&args, g) {
        Ok(nodes) => nodes,
        Err(err) => return Ok(Some(err)),
    };

    let table = match args.get_one::<f64>("inflate") {
        Some(multiplier) => cluster_inflated(g, dst, *multiplier),
        None => euclidean(g, dst),
    };

    let mut astar = AStar::new(g);
    match astar.search_with_table(src, dst, &table) {
        Ok(sp) => Ok(Some(
            SearchReport::new(g, sp.as_ref(), astar.stats()).to_string(),
        )),
        Err(err) => Ok(Some(format!("Search failed: {}", err))),
    }
}

fn run_compare(args: ArgMatches, context: &mut Context) -> Result<Option<String>> {
    let g = &context.graph;
    let (src, dst) = match node_args(&args, g) {
        Ok(nodes) => nodes,
        Err(err) => return Ok(Some(err)),
    };
    let multiplier = *args.get_one::<f64>("multiplier").unwrap_or(&context.multiplier);

    let plain = euclidean(g, dst);
    let inflated = cluster_inflated(g, dst, multiplier);

    match compare_heuristics(g, src, dst, &[("euclidean", &plain), ("cluster", &inflated)]) {
        Ok(rows) => Ok(Some(
            rows.iter()
                .map(|row| row.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        )),
        Err(err) => Ok(Some(format!("Comparison failed: {}", err))),
    }
}

fn run_audit(args: ArgMatches, context: &mut Context) -> Result<Option<String>> {
    let g = &context.graph;
    let goal = match node_arg(&args, "goal", g) {
        Ok(goal) => goal,
        Err(err) => return Ok(Some(err)),
    };

    let mut res = String::new();
    for (label, table) in [
        ("euclidean", euclidean(g, goal)),
        ("cluster", cluster_inflated(g, goal, context.multiplier)),
    ] {
        match table.audit(g, goal) {
            Ok(audit) => res.push_str(&format!(
                "{:<10} admissible: {:<5} consistent: {:<5} {}\n",
                label,
                audit.is_admissible(),
                audit.is_consistent(),
                audit
            )),
            Err(err) => return Ok(Some(format!("Audit failed: {}", err))),
        }
    }

    Ok(Some(res))
}

fn measure_dijkstra(args: ArgMatches, context: &mut Context) -> Result<Option<String>> {
    use rand::Rng;

    let n = *args.get_one::<usize>("n").unwrap_or(&10);
    let num_nodes = context.graph.num_nodes();
    if num_nodes == 0 {
        return Ok(Some("Graph is empty".to_string()));
    }

    // Select n random start and end nodes
    let mut rng = rand::thread_rng();
    let queries: Vec<(NodeIndex, NodeIndex)> = (0..n)
        .map(|_| {
            (
                NodeIndex::new(rng.gen_range(0..num_nodes)),
                NodeIndex::new(rng.gen_range(0..num_nodes)),
            )
        })
        .collect();

    let mut res = String::new();
    let mut dijkstra = Dijkstra::new(&context.graph);
    for (src, dst) in queries {
        match dijkstra.search(src, dst) {
            Ok(Some(sp)) => res.push_str(&format!(
                "{} -> {}: cost {:.3} in {:.3} ms, {} nodes settled\n",
                src,
                dst,
                sp.weight,
                dijkstra.stats().millis(),
                dijkstra.stats().nodes_settled
            )),
            Ok(None) => res.push_str(&format!("{} -> {}: no path\n", src, dst)),
            Err(err) => res.push_str(&format!("{} -> {}: {}\n", src, dst, err)),
        }
    }

    Ok(Some(res))
}

struct Context {
    graph: Graph,
    multiplier: f64,
}

impl Context {
    fn new(graph: Graph) -> Self {
        Self {
            graph,
            multiplier: pathfinder_core::constants::CROSS_CLUSTER_MULTIPLIER,
        }
    }
}

fn node_pair(command: &'static str) -> Command {
    Command::new(command)
        .arg(
            Arg::new("src")
                .required(true)
                .help("Name or ID of source node"),
        )
        .arg(
            Arg::new("dst")
                .required(true)
                .help("Name or ID of destination node"),
        )
}

/// Loads `repl <edges.csv>` or `repl <nodes.csv> <edges.csv>`, without
/// arguments a small demo graph.
fn load_graph() -> Graph {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.as_slice() {
        [] => {
            info!("No csv files given, using the demo graph");
            return generate_diamond_graph();
        }
        [edges] => Graph::from_edges_csv(Path::new(edges)),
        [nodes, edges, ..] => Graph::from_csv(Path::new(nodes), Path::new(edges)),
    };

    match result {
        Ok(g) => g,
        Err(err) => {
            eprintln!("Failed to load graph: {:?}", err);
            std::process::exit(1);
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let context = Context::new(load_graph());

    let mut repl = Repl::new(context)
        .with_name("Pathfinder")
        .with_version("v0.1.0")
        .with_description("Simple REPL to test graph search algorithms")
        .with_banner("Welcome to Pathfinder")
        .with_history(PathBuf::from(r".\history"), 100)
        .with_command(Command::new("info").about("Print graph info"), info)
        .with_command(
            node_pair("dijk").about("Calculate shortest path using Dijkstra's algorithm"),
            run_dijkstra,
        )
        .with_command(
            node_pair("astar")
                .arg(
                    Arg::new("inflate")
                        .long("inflate")
                        .value_parser(value_parser!(f64))
                        .help("Multiply estimates across clusters by this factor"),
                )
                .about("Calculate shortest path using A* with the straight line distance"),
            run_astar,
        )
        .with_command(
            node_pair("compare")
                .arg(
                    Arg::new("multiplier")
                        .value_parser(value_parser!(f64))
                        .required(false)
                        .help("Factor for estimates across clusters"),
                )
                .about("Compare Dijkstra with A* using plain and cluster inflated estimates"),
            run_compare,
        )
        .with_command(
            Command::new("audit")
                .arg(
                    Arg::new("goal")
                        .required(true)
                        .help("Name or ID of the goal node"),
                )
                .about("Check both heuristics against the exact distances to `goal`"),
            run_audit,
        )
        .with_command(
            Command::new("dijkm")
                .arg(
                    Arg::new("n")
                        .value_parser(value_parser!(usize))
                        .required(false)
                        .help("Number of random shortest paths to calculate"),
                )
                .about("Measure `n` random shortest paths calculations"),
            measure_dijkstra,
        );

    repl.run()
}

use crate::{
    constants::{NodeId, Weight},
    error::GraphError,
};
use anyhow::Context;
use csv::StringRecord;
use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use std::{fmt, fs::File, path::Path};

/// Default integer type for node and edge indices
/// Needs to be increased for very large graphs > u32::max
pub type DefaultIdx = u32;

/// Node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(DefaultIdx);

impl NodeIndex {
    #[inline]
    pub fn new(x: usize) -> Self {
        NodeIndex(x as DefaultIdx)
    }

    /// Checked version of `new`. `None` for ids that do not fit the index
    /// type, including the reserved `end()` value.
    #[inline]
    pub fn try_new(x: usize) -> Option<Self> {
        match DefaultIdx::try_from(x) {
            Ok(idx) if idx != DefaultIdx::MAX => Some(NodeIndex(idx)),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn end() -> Self {
        NodeIndex(DefaultIdx::MAX)
    }
}

impl From<usize> for NodeIndex {
    fn from(ix: usize) -> Self {
        NodeIndex::new(ix)
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short version of `NodeIndex::new`
pub fn node_index(index: usize) -> NodeIndex {
    NodeIndex::new(index)
}

/// Edge identifier.
#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct EdgeIndex(DefaultIdx);

impl EdgeIndex {
    #[inline]
    pub fn new(x: usize) -> Self {
        EdgeIndex(x as DefaultIdx)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// An invalid `EdgeIndex` used to denote absence of an edge.
    #[inline]
    pub fn end() -> Self {
        EdgeIndex(DefaultIdx::MAX)
    }
}

/// A place in the graph. Coordinates and cluster are only used to derive
/// heuristic values, the search itself never looks at them.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: Option<String>,
    pub coords: Option<[f64; 2]>,
    pub cluster: Option<String>,
}

impl Node {
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Node {
            id,
            name: None,
            coords: Some([x, y]),
            cluster: None,
        }
    }

    pub fn named(id: NodeId, name: &str, x: f64, y: f64) -> Self {
        Node {
            name: Some(name.to_string()),
            ..Node::new(id, x, y)
        }
    }

    /// Node without name and position, e.g. for graphs read from an edge list only.
    pub fn bare(id: NodeId) -> Self {
        Node {
            id,
            name: None,
            coords: None,
            cluster: None,
        }
    }

    pub fn with_cluster(mut self, cluster: &str) -> Self {
        self.cluster = Some(cluster.to_string());
        self
    }
}

/// A single arc. Undirected edges are flagged with `is_bidir` and are stored
/// as two arcs, one per direction.
///
/// Weights must be non-negative. Negative weights are not rejected, but the
/// search gives no guarantees for them.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub weight: Weight,
    pub is_bidir: bool,
}

impl Edge {
    pub fn new(source: NodeIndex, target: NodeIndex, weight: Weight) -> Self {
        Edge {
            source,
            target,
            weight,
            is_bidir: false,
        }
    }

    pub fn new_bidir(source: NodeIndex, target: NodeIndex, weight: Weight) -> Self {
        Edge {
            source,
            target,
            weight,
            is_bidir: true,
        }
    }

    pub(crate) fn reverse(&self) -> Self {
        Edge {
            source: self.target,
            target: self.source,
            weight: self.weight,
            is_bidir: self.is_bidir,
        }
    }
}

/// Adjacency list graph over a dense id space `0..num_nodes()`.
///
/// Slots that were never assigned a node stay empty. They are part of the
/// identity space but have no arcs unless an edge mentions them.
#[derive(Clone, Default)]
pub struct Graph {
    pub edges_in: Vec<Vec<EdgeIndex>>,
    pub edges_out: Vec<Vec<EdgeIndex>>,
    pub nodes: Vec<Option<Node>>,
    pub edges: Vec<Edge>,
    name_index: FxHashMap<String, NodeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(num_nodes: usize, num_edges: usize) -> Self {
        Self {
            edges_in: Vec::with_capacity(num_nodes),
            edges_out: Vec::with_capacity(num_nodes),
            nodes: Vec::with_capacity(num_nodes),
            edges: Vec::with_capacity(num_edges),
            name_index: FxHashMap::default(),
        }
    }

    /// Makes sure `node_idx` is inside the identity space.
    fn grow_to(&mut self, node_idx: NodeIndex) {
        assert!(
            NodeIndex::end() != node_idx,
            "Maximum number of nodes for index type {} exceeded",
            std::any::type_name::<DefaultIdx>()
        );

        let len = node_idx.index() + 1;
        if self.nodes.len() < len {
            self.nodes.resize(len, None);
            self.edges_in.resize(len, Vec::new());
            self.edges_out.resize(len, Vec::new());
        }
    }

    /// Inserts `node` at `node.id` or overwrites the node already stored there.
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        let node_idx = NodeIndex::new(node.id);
        self.grow_to(node_idx);

        let stale_name = self.nodes[node_idx.index()]
            .as_ref()
            .and_then(|old| old.name.clone());
        if let Some(stale_name) = stale_name {
            if self.name_index.get(&stale_name) == Some(&node_idx) {
                self.name_index.remove(&stale_name);
            }
        }
        if let Some(name) = &node.name {
            self.name_index.insert(name.clone(), node_idx);
        }

        self.nodes[node_idx.index()] = Some(node);
        node_idx
    }

    fn push_arc(&mut self, edge: Edge) -> EdgeIndex {
        let edge_idx = EdgeIndex::new(self.edges.len());

        assert!(
            EdgeIndex::end() != edge_idx,
            "Maximum number of edges for index type {} exceeded",
            std::any::type_name::<DefaultIdx>()
        );

        self.edges_out[edge.source.index()].push(edge_idx);
        self.edges_in[edge.target.index()].push(edge_idx);
        self.edges.push(edge);

        edge_idx
    }

    /// Add a new `edge` to the graph. Parallel edges and self-loops are kept
    /// as they are, an undirected edge is expanded into two arcs.
    ///
    /// Returns the index of the arc `source -> target`.
    pub fn add_edge(&mut self, edge: Edge) -> EdgeIndex {
        self.grow_to(edge.source);
        self.grow_to(edge.target);

        if edge.is_bidir {
            let reverse = edge.reverse();
            let edge_idx = self.push_arc(edge);
            self.push_arc(reverse);
            edge_idx
        } else {
            self.push_arc(edge)
        }
    }

    /// Size of the identity space.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored arcs (undirected edges count twice).
    pub fn num_arcs(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, node_idx: NodeIndex) -> bool {
        node_idx.index() < self.nodes.len()
    }

    pub fn node(&self, node_idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(node_idx.index())?.as_ref()
    }

    /// Returns an iterator over all assigned nodes of the graph
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().flatten()
    }

    /// Returns an iterator over all arcs of the graph
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn neighbors_outgoing(
        &self,
        node_idx: NodeIndex,
    ) -> impl Iterator<Item = (EdgeIndex, &Edge)> + '_ {
        self.edges_out
            .get(node_idx.index())
            .into_iter()
            .flatten()
            .map(move |edge_idx| (*edge_idx, &self.edges[edge_idx.index()]))
    }

    pub fn neighbors_incoming(
        &self,
        node_idx: NodeIndex,
    ) -> impl Iterator<Item = (EdgeIndex, &Edge)> + '_ {
        self.edges_in
            .get(node_idx.index())
            .into_iter()
            .flatten()
            .map(move |edge_idx| (*edge_idx, &self.edges[edge_idx.index()]))
    }

    /// Exact lookup of a node by its name.
    pub fn id_for(&self, name: &str) -> Result<NodeIndex, GraphError> {
        self.name_index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::NotFound(name.to_string()))
    }

    /// Resolves user input which is either a node name or a numeric id.
    /// Names win over ids if a node happens to be named like a number.
    /// Ids outside the identity space are rejected.
    pub fn resolve(&self, token: &str) -> Result<NodeIndex, GraphError> {
        let token = token.trim();
        self.id_for(token).or_else(|err| {
            let Ok(id) = token.parse::<usize>() else {
                return Err(err);
            };
            NodeIndex::try_new(id)
                .filter(|node_idx| self.contains(*node_idx))
                .ok_or_else(|| GraphError::UnknownId(token.to_string()))
        })
    }

    pub fn name_of(&self, node_idx: NodeIndex) -> Option<&str> {
        self.node(node_idx)?.name.as_deref()
    }

    /// Human readable label of a node, its name if it has one.
    pub fn label(&self, node_idx: NodeIndex) -> String {
        match self.name_of(node_idx) {
            Some(name) => name.to_string(),
            None => node_idx.to_string(),
        }
    }

    pub fn info(&self) -> String {
        format!(
            "Graph:\t#Nodes: {} ({} slots), #Arcs: {}, #Named: {}",
            self.nodes().count(),
            self.nodes.len(),
            self.edges.len(),
            self.name_index.len()
        )
    }

    /// Reads a node table (`id,name,x,y[,cluster]`) and an edge table
    /// (`from,to,weight[,directed]`). Malformed rows are skipped with a warning.
    pub fn from_csv(path_to_nodes: &Path, path_to_edges: &Path) -> anyhow::Result<Self> {
        let mut g = Graph::new();

        let mut reader = csv_reader(path_to_nodes)?;
        for result in reader.records() {
            match result {
                Ok(record) => match parse_node(&record) {
                    Some(node) => {
                        g.add_node(node);
                    }
                    None => warn!("Skipping malformed node row {}", describe(&record)),
                },
                Err(err) => warn!("Skipping unreadable node row: {}", err),
            }
        }

        g.read_edges(path_to_edges)?;

        info!("Graph has {} nodes and {} arcs", g.num_nodes(), g.num_arcs());
        Ok(g)
    }

    /// Reads a graph from an edge table only. Nodes are created on demand,
    /// without names or coordinates.
    pub fn from_edges_csv(path_to_edges: &Path) -> anyhow::Result<Self> {
        let mut g = Graph::new();
        g.read_edges(path_to_edges)?;

        for idx in 0..g.nodes.len() {
            if g.nodes[idx].is_none() && !(g.edges_out[idx].is_empty() && g.edges_in[idx].is_empty())
            {
                g.nodes[idx] = Some(Node::bare(idx));
            }
        }

        info!("Graph has {} nodes and {} arcs", g.num_nodes(), g.num_arcs());
        Ok(g)
    }

    fn read_edges(&mut self, path_to_edges: &Path) -> anyhow::Result<()> {
        let mut reader = csv_reader(path_to_edges)?;
        let mut skipped = 0;
        for result in reader.records() {
            match result {
                Ok(record) => match parse_edge(&record) {
                    Some(edge) => {
                        if edge.weight < 0.0 {
                            warn!(
                                "Negative weight in edge row {}, shortest paths are undefined",
                                describe(&record)
                            );
                        }
                        self.add_edge(edge);
                    }
                    None => {
                        skipped += 1;
                        warn!("Skipping malformed edge row {}", describe(&record));
                    }
                },
                Err(err) => {
                    skipped += 1;
                    warn!("Skipping unreadable edge row: {}", err);
                }
            }
        }
        debug!("Read edges from {:?}, {} rows skipped", path_to_edges, skipped);
        Ok(())
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes.len())
            .field("arcs", &self.edges.len())
            .finish()
    }
}

/// Opens a csv file with a header row, trimmed fields and a variable number
/// of columns per row.
pub(crate) fn csv_reader(path: &Path) -> anyhow::Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Could not open {:?}", path))
}

pub(crate) fn describe(record: &StringRecord) -> String {
    match record.position() {
        Some(pos) => format!("(line {}): {:?}", pos.line(), record),
        None => format!("{:?}", record),
    }
}

/// Returns the field at `i` unless it is missing or empty.
pub(crate) fn field(record: &StringRecord, i: usize) -> Option<&str> {
    record.get(i).filter(|value| !value.is_empty())
}

/// Parses a node id and rejects ids that do not fit into a `NodeIndex`.
fn parse_id(value: &str) -> Option<NodeIndex> {
    NodeIndex::try_new(value.parse::<NodeId>().ok()?)
}

fn parse_node(record: &StringRecord) -> Option<Node> {
    let id = parse_id(field(record, 0)?)?.index();
    let name = field(record, 1)?;

    let coords = match (field(record, 2), field(record, 3)) {
        (None, None) => None,
        (Some(x), Some(y)) => Some([x.parse().ok()?, y.parse().ok()?]),
        _ => return None,
    };

    Some(Node {
        id,
        name: Some(name.to_string()),
        coords,
        cluster: field(record, 4).map(str::to_string),
    })
}

fn parse_edge(record: &StringRecord) -> Option<Edge> {
    let source = parse_id(field(record, 0)?)?;
    let target = parse_id(field(record, 1)?)?;
    let weight = field(record, 2)?.parse::<Weight>().ok()?;

    let directed = match field(record, 3) {
        None => false,
        Some(flag) => flag.parse::<i64>().ok()? != 0,
    };

    Some(if directed {
        Edge::new(source, target, weight)
    } else {
        Edge::new_bidir(source, target, weight)
    })
}

/// Macro to create a edge from source to target with a weight
///
/// edge!(0 , 1, 3.0) Returns an undirected edge
///
/// edge!(0 => 1, 3.0) Returns directed edge
#[macro_export]
macro_rules! edge {
    ($source:expr => $target:expr, $weight:expr) => {
        $crate::graph::Edge::new($source.into(), $target.into(), $weight)
    };
    ($source:expr , $target:expr, $weight:expr) => {
        $crate::graph::Edge::new_bidir($source.into(), $target.into(), $weight)
    };
}

/// Macro to create a named node with a given id, x, y
/// node!(0, "A", 1.0, 1.0)
#[macro_export]
macro_rules! node {
    ($id:expr, $name:expr, $x:expr, $y:expr) => {
        $crate::graph::Node::named($id, $name, $x, $y)
    };
}

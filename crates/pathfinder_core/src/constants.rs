/// Edge weight type
pub type Weight = f64;
/// Raw node id as it appears in the node and edge tables
pub type NodeId = usize;
/// Factor applied to straight-line estimates between nodes of different clusters
pub const CROSS_CLUSTER_MULTIPLIER: Weight = 1.5;
/// Relative slack used when auditing heuristics against exact distances
pub const AUDIT_TOLERANCE: Weight = 1e-9;

use crate::{constants::Weight, graph::Node};

pub fn distance(a: [f64; 2], b: [f64; 2]) -> Weight {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

/// Euclidean distance between two nodes, 0 if one of them has no coordinates.
pub fn straight_line(src: &Node, dst: &Node) -> Weight {
    match (src.coords, dst.coords) {
        (Some(a), Some(b)) => distance(a, b),
        _ => 0.0,
    }
}

//! SWC Skeleton Module
//! Parses SWC morphology files into a node table.
//!
//! Each data row is `id type x y z radius parent`; a parent of `-1` marks a root.

use crate::error::{AccessError, Result};
use std::collections::HashMap;

/// One skeleton node.
#[derive(Debug, Clone, PartialEq)]
pub struct SwcNode {
    pub id: i64,
    pub kind: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub radius: f64,
    /// `None` for roots.
    pub parent: Option<i64>,
}

/// A neuron skeleton as a list of nodes, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNeuron {
    pub name: Option<String>,
    pub nodes: Vec<SwcNode>,
}

impl TreeNeuron {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn roots(&self) -> Vec<&SwcNode> {
        self.nodes.iter().filter(|n| n.parent.is_none()).collect()
    }

    fn child_counts(&self) -> HashMap<i64, usize> {
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for parent in self.nodes.iter().filter_map(|n| n.parent) {
            *counts.entry(parent).or_default() += 1;
        }
        counts
    }

    /// Nodes with more than one child.
    pub fn n_branch_points(&self) -> usize {
        self.child_counts().values().filter(|&&c| c > 1).count()
    }

    /// Nodes without children.
    pub fn n_leaves(&self) -> usize {
        let counts = self.child_counts();
        self.nodes.iter().filter(|n| !counts.contains_key(&n.id)).count()
    }

    /// Sum of parent-child edge lengths, in the file's spatial units.
    pub fn cable_length(&self) -> f64 {
        let by_id: HashMap<i64, &SwcNode> = self.nodes.iter().map(|n| (n.id, n)).collect();
        self.nodes
            .iter()
            .filter_map(|n| {
                let parent = by_id.get(&n.parent?)?;
                let (dx, dy, dz) = (n.x - parent.x, n.y - parent.y, n.z - parent.z);
                Some((dx * dx + dy * dy + dz * dz).sqrt())
            })
            .sum()
    }
}

/// Parse SWC text. Blank lines and `#` comments are skipped.
pub fn parse_swc(bytes: &[u8]) -> Result<TreeNeuron> {
    let text = std::str::from_utf8(bytes).map_err(|e| AccessError::parse("swc", e))?;
    let mut nodes = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 7 {
            return Err(AccessError::parse(
                "swc",
                format!("line {}: expected 7 fields, found {}", idx + 1, fields.len()),
            ));
        }
        let bad = |field: &str| AccessError::parse("swc", format!("line {}: invalid {field}", idx + 1));

        let id: i64 = fields[0].parse().map_err(|_| bad("node id"))?;
        // Some exporters write the type as a float
        let kind = fields[1].parse::<f64>().map_err(|_| bad("node type"))? as i32;
        let coord = |i: usize, name: &str| fields[i].parse::<f64>().map_err(|_| bad(name));
        let parent: i64 = fields[6]
            .parse::<f64>()
            .map(|p| p as i64)
            .map_err(|_| bad("parent id"))?;

        nodes.push(SwcNode {
            id,
            kind,
            x: coord(2, "x")?,
            y: coord(3, "y")?,
            z: coord(4, "z")?,
            radius: coord(5, "radius")?,
            parent: (parent >= 0).then_some(parent),
        });
    }

    Ok(TreeNeuron { name: None, nodes })
}

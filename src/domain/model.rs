use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// One budget flow: `amount` moves from the `source` bucket to the `target` bucket.
///
/// Rows are kept exactly as entered; [`crate::core::flow_graph::build`] is
/// responsible for rejecting bad amounts and labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source: String,
    pub target: String,
    pub amount: f64,
}

impl FlowEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, amount: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelField {
    Source,
    Target,
}

impl fmt::Display for LabelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelField::Source => f.write_str("source"),
            LabelField::Target => f.write_str("target"),
        }
    }
}

/// Reasons a set of rows cannot become a Sankey graph. Rows are 1-based.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("row {row}: amount {amount} must be a finite positive number")]
    InvalidAmount { row: usize, amount: f64 },

    #[error("row {row}: {field} name is empty")]
    InvalidLabel { row: usize, field: LabelField },

    #[error("row {row}: '{node}' flows into itself")]
    SelfLoop { row: usize, node: String },

    #[error("cycle detected: {}", .path.join(" -> "))]
    CycleDetected { path: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub amount: f64,
}

/// Deduplicated nodes in first-seen order and merged links that refer to them by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedGraph {
    pub nodes: Vec<String>,
    pub links: Vec<Link>,
}

impl NormalizedGraph {
    pub fn total_flow(&self) -> f64 {
        self.links.iter().map(|link| link.amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Per-node `(inflow, outflow)` totals, indexed like `nodes`.
    pub fn balances(&self) -> Vec<(f64, f64)> {
        let mut balances = vec![(0.0, 0.0); self.nodes.len()];
        for link in &self.links {
            balances[link.source].1 += link.amount;
            balances[link.target].0 += link.amount;
        }
        balances
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub color: Option<String>,
}

/// Nodes that are expected to have no inflow (roots) or no outflow (terminals).
///
/// `None` means nothing was designated and the matching dangling check is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Designations {
    pub roots: Option<BTreeSet<String>>,
    pub terminals: Option<BTreeSet<String>>,
}

impl Designations {
    pub fn add_root(&mut self, name: impl Into<String>) {
        self.roots.get_or_insert_with(BTreeSet::new).insert(name.into());
    }

    pub fn add_terminal(&mut self, name: impl Into<String>) {
        self.terminals
            .get_or_insert_with(BTreeSet::new)
            .insert(name.into());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlowWarning {
    MissingInflow { node: String },
    MissingOutflow { node: String },
    Overdrawn { node: String, inflow: f64, outflow: f64 },
}

impl fmt::Display for FlowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowWarning::MissingInflow { node } => write!(f, "'{}' has no incoming flow", node),
            FlowWarning::MissingOutflow { node } => {
                write!(f, "'{}' has no outgoing flow", node)
            }
            FlowWarning::Overdrawn {
                node,
                inflow,
                outflow,
            } => write!(
                f,
                "'{}' sends {:.2} but only receives {:.2} (short by {:.2})",
                node,
                outflow,
                inflow,
                outflow - inflow
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowSummary {
    pub node_count: usize,
    pub link_count: usize,
    pub total_flow: f64,
    /// Outflow of nodes without inflow.
    pub source_total: f64,
    /// Inflow of nodes without outflow.
    pub sink_total: f64,
    pub surplus: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowReport {
    pub warnings: Vec<FlowWarning>,
    pub summary: FlowSummary,
}

/// Diagram settings handed to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramSettings {
    pub title: String,
    pub title_color: String,
    pub show_amounts: bool,
    pub layout: LayoutSettings,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            title: "Budget Sankey Diagram".to_string(),
            title_color: "black".to_string(),
            show_amounts: true,
            layout: LayoutSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    pub title_font_size: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            paper_bgcolor: "white".to_string(),
            plot_bgcolor: "white".to_string(),
            width: 1000,
            height: 700,
            font_size: 12,
            title_font_size: 24,
        }
    }
}

use crate::core::session::BudgetSession;
use crate::domain::model::{
    Designations, DiagramSettings, FlowReport, FlowSummary, FlowWarning, LayoutSettings, Link,
    NormalizedGraph,
};
use crate::utils::format::label_with_amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ROOT_COLOR: &str = "#a6cee3";
pub const HUB_COLOR: &str = "#98df8a";
pub const TERMINAL_COLOR: &str = "#ffbb78";

/// The document handed to the diagram renderer. Node and link data are laid
/// out column-wise, the shape Sankey trace APIs take directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyPayload {
    pub title: String,
    pub title_color: String,
    pub layout: LayoutSettings,
    pub node: NodeColumns,
    pub link: LinkColumns,
    pub warnings: Vec<FlowWarning>,
    pub summary: FlowSummary,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeColumns {
    pub name: Vec<String>,
    pub label: Vec<String>,
    /// Throughput: the larger of a node's inflow and outflow.
    pub value: Vec<f64>,
    pub color: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkColumns {
    pub source: Vec<usize>,
    pub target: Vec<usize>,
    pub value: Vec<f64>,
    pub color: Vec<Option<String>>,
}

/// Tier colour for a node, or `None` when nothing was designated.
fn tier_color(name: &str, designations: &Designations) -> Option<String> {
    let roots = designations.roots.as_ref();
    let terminals = designations.terminals.as_ref();
    if roots.is_none() && terminals.is_none() {
        return None;
    }

    let color = if roots.is_some_and(|r| r.contains(name)) {
        ROOT_COLOR
    } else if terminals.is_some_and(|t| t.contains(name)) {
        TERMINAL_COLOR
    } else {
        HUB_COLOR
    };
    Some(color.to_string())
}

impl SankeyPayload {
    pub fn new(
        graph: &NormalizedGraph,
        report: &FlowReport,
        session: &BudgetSession,
        settings: &DiagramSettings,
    ) -> Self {
        let mut node = NodeColumns::default();
        for (name, (inflow, outflow)) in graph.nodes.iter().zip(graph.balances()) {
            let value = inflow.max(outflow);
            node.label.push(if settings.show_amounts {
                label_with_amount(name, value)
            } else {
                name.clone()
            });
            let color = session
                .style(name)
                .and_then(|style| style.color.clone())
                .or_else(|| tier_color(name, session.designations()));
            node.color.push(color);
            node.name.push(name.clone());
            node.value.push(value);
        }

        let mut link = LinkColumns::default();
        for l in &graph.links {
            link.source.push(l.source);
            link.target.push(l.target);
            link.value.push(l.amount);

            let from_root = session
                .designations()
                .roots
                .as_ref()
                .is_some_and(|roots| roots.contains(&graph.nodes[l.source]));
            let colored_by = if from_root { l.source } else { l.target };
            link.color.push(node.color[colored_by].clone());
        }

        Self {
            title: settings.title.clone(),
            title_color: settings.title_color.clone(),
            layout: settings.layout.clone(),
            node,
            link,
            warnings: report.warnings.clone(),
            summary: report.summary.clone(),
            generated_at: Utc::now(),
        }
    }

    /// Rebuilds the index-based graph from the column data.
    pub fn graph(&self) -> NormalizedGraph {
        NormalizedGraph {
            nodes: self.node.name.clone(),
            links: self
                .link
                .source
                .iter()
                .zip(&self.link.target)
                .zip(&self.link.value)
                .map(|((&source, &target), &amount)| Link {
                    source,
                    target,
                    amount,
                })
                .collect(),
        }
    }
}

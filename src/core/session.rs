use crate::core::{audit, flow_graph};
use crate::domain::model::{
    Designations, FlowEdge, FlowError, FlowReport, NodeStyle, NormalizedGraph,
};
use std::collections::BTreeMap;

/// Everything entered during one editing session: the flow rows in entry
/// order, per-node style overrides and root/terminal designations.
///
/// The session is an ordinary value. Callers own it and pass it to whatever
/// rebuilds the diagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetSession {
    rows: Vec<FlowEdge>,
    styles: BTreeMap<String, NodeStyle>,
    designations: Designations,
}

impl BudgetSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edge: FlowEdge) {
        self.rows.push(edge);
    }

    pub fn extend<I: IntoIterator<Item = FlowEdge>>(&mut self, edges: I) {
        self.rows.extend(edges);
    }

    pub fn remove(&mut self, index: usize) -> Option<FlowEdge> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.styles.clear();
        self.designations = Designations::default();
    }

    pub fn rows(&self) -> &[FlowEdge] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn set_color(&mut self, node: impl Into<String>, color: impl Into<String>) {
        self.styles.entry(node.into()).or_default().color = Some(color.into());
    }

    pub fn style(&self, node: &str) -> Option<&NodeStyle> {
        self.styles.get(node)
    }

    pub fn designate_root(&mut self, node: impl Into<String>) {
        self.designations.add_root(node);
    }

    pub fn designate_terminal(&mut self, node: impl Into<String>) {
        self.designations.add_terminal(node);
    }

    pub fn designations(&self) -> &Designations {
        &self.designations
    }

    pub fn build(&self) -> Result<NormalizedGraph, FlowError> {
        flow_graph::build(&self.rows)
    }

    pub fn audit(&self, graph: &NormalizedGraph) -> FlowReport {
        audit::audit(graph, &self.designations)
    }
}

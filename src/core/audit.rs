use crate::domain::model::{Designations, FlowReport, FlowSummary, FlowWarning, NormalizedGraph};

/// Differences below a cent are rounding noise from summing entered amounts.
const BALANCE_EPSILON: f64 = 0.005;

/// Non-fatal checks over a graph that already passed [`super::flow_graph::build`].
pub fn audit(graph: &NormalizedGraph, designations: &Designations) -> FlowReport {
    let balances = graph.balances();
    let mut warnings = Vec::new();
    let mut summary = FlowSummary {
        node_count: graph.nodes.len(),
        link_count: graph.links.len(),
        total_flow: graph.total_flow(),
        ..FlowSummary::default()
    };

    for (name, &(inflow, outflow)) in graph.nodes.iter().zip(&balances) {
        let has_inflow = inflow > 0.0;
        let has_outflow = outflow > 0.0;

        if !has_inflow {
            summary.source_total += outflow;
            if let Some(roots) = &designations.roots {
                if !roots.contains(name) {
                    warnings.push(FlowWarning::MissingInflow { node: name.clone() });
                }
            }
        }

        if !has_outflow {
            summary.sink_total += inflow;
            if let Some(terminals) = &designations.terminals {
                if !terminals.contains(name) {
                    warnings.push(FlowWarning::MissingOutflow { node: name.clone() });
                }
            }
        }

        if has_inflow && has_outflow && outflow - inflow > BALANCE_EPSILON {
            warnings.push(FlowWarning::Overdrawn {
                node: name.clone(),
                inflow,
                outflow,
            });
        }
    }

    summary.surplus = summary.source_total - summary.sink_total;

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    FlowReport { warnings, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::flow_graph::build;
    use crate::domain::model::FlowEdge;

    fn graph(rows: &[(&str, &str, f64)]) -> NormalizedGraph {
        let edges: Vec<FlowEdge> = rows
            .iter()
            .map(|&(s, t, a)| FlowEdge::new(s, t, a))
            .collect();
        build(&edges).unwrap()
    }

    #[test]
    fn test_balanced_budget_has_no_warnings() {
        let g = graph(&[
            ("Salary", "Budget", 100.0),
            ("Budget", "Rent", 70.0),
            ("Budget", "Food", 30.0),
        ]);
        let mut designations = Designations::default();
        designations.add_root("Salary");
        designations.add_terminal("Rent");
        designations.add_terminal("Food");

        let report = audit(&g, &designations);

        assert!(report.warnings.is_empty());
        assert_eq!(report.summary.node_count, 4);
        assert_eq!(report.summary.link_count, 3);
        assert_eq!(report.summary.source_total, 100.0);
        assert_eq!(report.summary.sink_total, 100.0);
        assert_eq!(report.summary.surplus, 0.0);
    }

    #[test]
    fn test_overspent_hub_is_flagged() {
        let g = graph(&[
            ("Salary", "Budget", 100.0),
            ("Budget", "Rent", 90.0),
            ("Budget", "Travel", 25.0),
        ]);

        let report = audit(&g, &Designations::default());

        assert_eq!(
            report.warnings,
            vec![FlowWarning::Overdrawn {
                node: "Budget".into(),
                inflow: 100.0,
                outflow: 115.0
            }]
        );
        assert_eq!(report.summary.surplus, -15.0);
    }

    #[test]
    fn test_unallocated_income_is_not_a_warning() {
        let g = graph(&[("Salary", "Budget", 100.0), ("Budget", "Rent", 40.0)]);
        let report = audit(&g, &Designations::default());

        assert!(report.warnings.is_empty());
        assert_eq!(report.summary.surplus, 60.0);
    }

    #[test]
    fn test_dangling_nodes_flagged_only_when_designated() {
        let g = graph(&[
            ("Salary", "Budget", 100.0),
            ("Budget", "Rent", 50.0),
            ("Savings", "Budget", 10.0),
        ]);

        assert!(audit(&g, &Designations::default()).warnings.is_empty());

        let mut designations = Designations::default();
        designations.add_root("Salary");
        designations.add_terminal("Salary");

        let report = audit(&g, &designations);
        assert_eq!(
            report.warnings,
            vec![
                FlowWarning::MissingOutflow {
                    node: "Rent".into(),
                },
                FlowWarning::MissingInflow {
                    node: "Savings".into(),
                },
            ]
        );
    }
}

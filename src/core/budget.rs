//! The income/expense form: every income source pays into a single hub
//! bucket and the hub pays out to every expense category. Free-form flows
//! (e.g. an expense split into sub-categories) can follow.

use crate::core::session::BudgetSession;
use crate::domain::model::FlowEdge;
use crate::utils::error::{Result, SankeyError};
use crate::utils::format::format_currency;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_HUB_LABEL: &str = "Budget";

/// One income source or expense category as entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub color: Option<String>,
}

impl BudgetEntry {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
            color: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetTotals {
    pub total_income: f64,
    pub total_expenses: f64,
}

impl BudgetTotals {
    pub fn from_entries(income: &[BudgetEntry], expenses: &[BudgetEntry]) -> Self {
        Self {
            total_income: income.iter().map(|e| e.amount).sum(),
            total_expenses: expenses.iter().map(|e| e.amount).sum(),
        }
    }

    /// Positive when expenses exceed income.
    pub fn discrepancy(&self) -> f64 {
        self.total_expenses - self.total_income
    }
}

/// Maps the form into session rows.
///
/// Incomes become designated roots and expenses designated terminals. Leaf
/// targets of free-form flows are terminals too; their sources are left
/// undesignated so an unfunded bucket gets flagged. Without any income or
/// expense entries the flows are taken as-is and nothing is designated.
pub fn budget_session(
    hub_label: &str,
    income: &[BudgetEntry],
    expenses: &[BudgetEntry],
    flows: &[FlowEdge],
) -> Result<BudgetSession> {
    let mut session = BudgetSession::new();

    if income.is_empty() && expenses.is_empty() {
        if flows.is_empty() {
            return Err(SankeyError::EmptyInput {
                message: "the budget has no income, expenses or flows".to_string(),
            });
        }
        session.extend(flows.iter().cloned());
        return Ok(session);
    }

    if income.is_empty() {
        return Err(SankeyError::EmptyInput {
            message: "enter at least one income source".to_string(),
        });
    }
    if expenses.is_empty() && flows.is_empty() {
        return Err(SankeyError::EmptyInput {
            message: "enter at least one expense category".to_string(),
        });
    }

    let totals = BudgetTotals::from_entries(income, expenses);
    tracing::info!("Total Income: {}", format_currency(totals.total_income));
    tracing::info!("Total Expenses: {}", format_currency(totals.total_expenses));
    if totals.discrepancy() > 0.0 {
        tracing::warn!(
            "Total expenses exceed total income by {}",
            format_currency(totals.discrepancy())
        );
    }

    for entry in income {
        session.push(FlowEdge::new(entry.name.clone(), hub_label, entry.amount));
        session.designate_root(entry.name.clone());
        if let Some(color) = &entry.color {
            session.set_color(entry.name.clone(), color.clone());
        }
    }

    for entry in expenses {
        session.push(FlowEdge::new(hub_label, entry.name.clone(), entry.amount));
        session.designate_terminal(entry.name.clone());
        if let Some(color) = &entry.color {
            session.set_color(entry.name.clone(), color.clone());
        }
    }

    let flow_sources: HashSet<&str> = flows.iter().map(|f| f.source.as_str()).collect();
    for flow in flows {
        if !flow_sources.contains(flow.target.as_str()) {
            session.designate_terminal(flow.target.clone());
        }
        session.push(flow.clone());
    }

    Ok(session)
}

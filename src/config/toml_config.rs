use crate::core::budget::{budget_session, BudgetEntry, DEFAULT_HUB_LABEL};
use crate::core::session::BudgetSession;
use crate::domain::model::{DiagramSettings, FlowEdge, LayoutSettings};
use crate::utils::error::{Result, SankeyError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A budget described in a TOML file.
///
/// ```toml
/// [diagram]
/// title = "Annual Budget Overview"
///
/// [[income]]
/// name = "Job Salary"
/// amount = 165000
///
/// [[expenses]]
/// name = "Rent"
/// amount = 27120
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetFile {
    #[serde(default)]
    pub diagram: DiagramConfig,
    #[serde(default)]
    pub income: Vec<BudgetEntry>,
    #[serde(default)]
    pub expenses: Vec<BudgetEntry>,
    #[serde(default)]
    pub flows: Vec<FlowEdge>,
    #[serde(default)]
    pub nodes: NodesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub title: String,
    pub title_color: String,
    pub hub_label: String,
    pub show_amounts: bool,
    pub layout: LayoutSettings,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        let settings = DiagramSettings::default();
        Self {
            title: settings.title,
            title_color: settings.title_color,
            hub_label: DEFAULT_HUB_LABEL.to_string(),
            show_amounts: settings.show_amounts,
            layout: settings.layout,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodesConfig {
    pub roots: Vec<String>,
    pub terminals: Vec<String>,
    pub colors: BTreeMap<String, String>,
}

impl BudgetFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SankeyError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SankeyError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("diagram.title", &self.diagram.title)?;
        validation::validate_non_empty_string("diagram.hub_label", &self.diagram.hub_label)?;
        validation::validate_color("diagram.title_color", &self.diagram.title_color)?;

        let layout = &self.diagram.layout;
        validation::validate_color("diagram.layout.paper_bgcolor", &layout.paper_bgcolor)?;
        validation::validate_color("diagram.layout.plot_bgcolor", &layout.plot_bgcolor)?;
        validation::validate_range("diagram.layout.width", layout.width, 100, 10_000)?;
        validation::validate_range("diagram.layout.height", layout.height, 100, 10_000)?;
        validation::validate_range("diagram.layout.font_size", layout.font_size, 1, 100)?;
        validation::validate_range(
            "diagram.layout.title_font_size",
            layout.title_font_size,
            1,
            100,
        )?;

        for (field, entries) in [("income", &self.income), ("expenses", &self.expenses)] {
            for entry in entries {
                if let Some(color) = &entry.color {
                    validation::validate_color(&format!("{}.{}.color", field, entry.name), color)?;
                }
            }
        }

        for (node, color) in &self.nodes.colors {
            validation::validate_color(&format!("nodes.colors.{}", node), color)?;
        }

        Ok(())
    }

    pub fn settings(&self) -> DiagramSettings {
        DiagramSettings {
            title: self.diagram.title.clone(),
            title_color: self.diagram.title_color.clone(),
            show_amounts: self.diagram.show_amounts,
            layout: self.diagram.layout.clone(),
        }
    }

    /// Rows, designations and colour overrides for one editing session.
    pub fn session(&self) -> Result<BudgetSession> {
        let mut session = budget_session(
            &self.diagram.hub_label,
            &self.income,
            &self.expenses,
            &self.flows,
        )?;

        for root in &self.nodes.roots {
            session.designate_root(root.clone());
        }
        for terminal in &self.nodes.terminals {
            session.designate_terminal(terminal.clone());
        }
        for (node, color) in &self.nodes.colors {
            session.set_color(node.clone(), color.clone());
        }

        Ok(session)
    }
}

impl Validate for BudgetFile {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

//! Budget flows in, Sankey-ready graph data out.
//!
//! Rows of `(source, target, amount)` are validated and merged by
//! [`core::flow_graph::build`] into a [`domain::model::NormalizedGraph`],
//! audited for dangling or overdrawn buckets, and written as a payload a
//! Sankey renderer can draw directly.

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::pipelines::sankey_pipeline::SankeyPipeline;
pub use config::cli::LocalStorage;
pub use core::{engine::SankeyEngine, flow_graph::build, session::BudgetSession};
pub use domain::model::{FlowEdge, FlowError, NormalizedGraph};
pub use utils::error::{Result, SankeyError};

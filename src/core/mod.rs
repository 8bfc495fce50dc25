pub mod audit;
pub mod budget;
pub mod engine;
pub mod flow_graph;
pub mod payload;
pub mod session;

pub use crate::domain::ports::{
    BudgetInput, ConfigProvider, Pipeline, Storage, TransformResult,
};
pub use crate::utils::error::Result;

use crate::core::payload::SankeyPayload;
use crate::core::session::BudgetSession;
use crate::domain::model::{DiagramSettings, FlowReport, NormalizedGraph};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn title_override(&self) -> Option<&str>;
    fn show_amounts(&self) -> bool;
    fn strict(&self) -> bool;
}

/// What `extract` hands to `transform`: the entered rows and how to draw them.
#[derive(Debug, Clone)]
pub struct BudgetInput {
    pub session: BudgetSession,
    pub settings: DiagramSettings,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub graph: NormalizedGraph,
    pub report: FlowReport,
    pub payload: SankeyPayload,
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<BudgetInput>;
    async fn transform(&self, input: BudgetInput) -> Result<TransformResult>;
    /// Returns the paths written.
    async fn load(&self, result: TransformResult) -> Result<Vec<String>>;
}

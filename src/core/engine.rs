use crate::core::{Pipeline, TransformResult};
use crate::utils::error::Result;

pub struct SankeyEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SankeyEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extract and transform only; nothing is written.
    pub async fn check(&self) -> Result<TransformResult> {
        tracing::info!("Reading budget rows...");
        let input = self.pipeline.extract().await?;
        tracing::info!("Read {} rows", input.session.len());

        tracing::info!("Building flow graph...");
        let result = self.pipeline.transform(input).await?;
        tracing::info!(
            "Built {} nodes and {} links ({} warnings)",
            result.graph.nodes.len(),
            result.graph.links.len(),
            result.report.warnings.len()
        );

        Ok(result)
    }

    pub async fn run(&self) -> Result<Vec<String>> {
        let result = self.check().await?;

        tracing::info!("Writing diagram data...");
        let written = self.pipeline.load(result).await?;
        for path in &written {
            tracing::info!("Output saved to: {}", path);
        }

        Ok(written)
    }
}

use crate::domain::model::{FlowEdge, NormalizedGraph};
use crate::utils::error::{Result, SankeyError};

/// Reads `source,target,amount` rows. Surrounding whitespace in every field is trimmed.
pub fn read_rows(data: &[u8]) -> Result<Vec<FlowEdge>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: FlowEdge = record?;
        rows.push(row);
    }

    tracing::debug!("Read {} CSV rows", rows.len());
    Ok(rows)
}

/// Writes the merged links back out by name.
pub fn write_links(graph: &NormalizedGraph) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for link in &graph.links {
        writer.serialize(FlowEdge::new(
            graph.nodes[link.source].clone(),
            graph.nodes[link.target].clone(),
            link.amount,
        ))?;
    }

    writer.flush()?;
    writer.into_inner().map_err(|e| {
        SankeyError::IoError(std::io::Error::new(e.error().kind(), e.error().to_string()))
    })
}

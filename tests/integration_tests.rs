use budget_sankey::core::payload::SankeyPayload;
use budget_sankey::domain::model::FlowError;
use budget_sankey::{CliConfig, LocalStorage, SankeyEngine, SankeyError, SankeyPipeline};
use tempfile::TempDir;

const ANNUAL_BUDGET: &str = r#"
[diagram]
title = "Annual Budget Overview"

[[income]]
name = "Job Salary"
amount = 165000

[[income]]
name = "Miranda"
amount = 7200.00

[[income]]
name = "Chase Cash Back"
amount = 600.00

[[income]]
name = "VMFXX Dividend"
amount = 1800.00

[[expenses]]
name = "Rent"
amount = 27120.00

[[expenses]]
name = "Groceries"
amount = 7200.00

[[expenses]]
name = "Utilities"
amount = 4800.00

[[expenses]]
name = "Transportation"
amount = 1620.00
"#;

fn config(input: String, output_path: String, formats: &[&str]) -> CliConfig {
    CliConfig {
        input,
        output_path,
        formats: formats.iter().map(|f| f.to_string()).collect(),
        title: None,
        hide_amounts: false,
        strict: false,
        dry_run: false,
        verbose: false,
        json_logs: false,
    }
}

#[tokio::test]
async fn test_end_to_end_toml_budget() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("budget.toml");
    std::fs::write(&input, ANNUAL_BUDGET).unwrap();
    let output_path = temp_dir.path().join("out");

    let config = config(
        input.to_string_lossy().into_owned(),
        output_path.to_string_lossy().into_owned(),
        &["json", "csv"],
    );
    let engine = SankeyEngine::new(SankeyPipeline::new(LocalStorage::default(), config));

    let written = engine.run().await.unwrap();
    assert_eq!(written.len(), 2);

    let json = std::fs::read(output_path.join("budget_sankey.json")).unwrap();
    let payload: SankeyPayload = serde_json::from_slice(&json).unwrap();

    assert_eq!(payload.title, "Annual Budget Overview");
    assert_eq!(payload.node.name.len(), 9);
    assert_eq!(payload.node.name[1], "Budget");
    assert_eq!(payload.node.label[0], "Job Salary\n$165,000.00");
    assert_eq!(payload.link.source.len(), 8);
    assert!(payload.warnings.is_empty());
    assert_eq!(payload.summary.source_total, 174600.0);
    assert_eq!(payload.summary.sink_total, 40740.0);

    let csv = std::fs::read_to_string(output_path.join("budget_sankey_links.csv")).unwrap();
    assert_eq!(csv.lines().count(), 9);
    assert!(csv.contains("Job Salary,Budget,165000.0"));
}

#[tokio::test]
async fn test_end_to_end_csv_rows_with_cycle() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("rows.csv");
    std::fs::write(
        &input,
        "source,target,amount\nChecking,Savings,500\nSavings,Checking,100\n",
    )
    .unwrap();
    let output_path = temp_dir.path().join("out");

    let config = config(
        input.to_string_lossy().into_owned(),
        output_path.to_string_lossy().into_owned(),
        &["json"],
    );
    let engine = SankeyEngine::new(SankeyPipeline::new(LocalStorage::default(), config));

    let err = engine.run().await.unwrap_err();
    match err {
        SankeyError::FlowError(FlowError::CycleDetected { path }) => {
            assert_eq!(path, vec!["Checking", "Savings", "Checking"]);
        }
        other => panic!("expected a cycle, got {:?}", other),
    }
    assert!(!output_path.join("budget_sankey.json").exists());
}

#[tokio::test]
async fn test_check_does_not_write() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("rows.csv");
    std::fs::write(&input, "source,target,amount\nSalary,Rent,1000\n").unwrap();
    let output_path = temp_dir.path().join("out");

    let config = config(
        input.to_string_lossy().into_owned(),
        output_path.to_string_lossy().into_owned(),
        &["json"],
    );
    let engine = SankeyEngine::new(SankeyPipeline::new(LocalStorage::default(), config));

    let result = engine.check().await.unwrap();
    assert_eq!(result.graph.nodes, vec!["Salary", "Rent"]);
    assert!(!output_path.exists());
}

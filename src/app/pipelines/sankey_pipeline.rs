use crate::config::csv_rows;
use crate::config::toml_config::BudgetFile;
use crate::core::payload::SankeyPayload;
use crate::core::session::BudgetSession;
use crate::core::{BudgetInput, ConfigProvider, Pipeline, Storage, TransformResult};
use crate::domain::model::DiagramSettings;
use crate::utils::error::{Result, SankeyError};
use crate::utils::validation::Validate;
use std::path::Path;

pub const JSON_OUTPUT: &str = "budget_sankey.json";
pub const CSV_OUTPUT: &str = "budget_sankey_links.csv";

pub struct SankeyPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> SankeyPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn input_kind(&self) -> Result<String> {
        let input = self.config.input_path();
        Path::new(input)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or_else(|| SankeyError::InvalidConfigValueError {
                field: "input".to_string(),
                value: input.to_string(),
                reason: "File has no extension or invalid filename".to_string(),
            })
    }

    fn apply_overrides(&self, settings: &mut DiagramSettings) {
        if let Some(title) = self.config.title_override() {
            settings.title = title.to_string();
        }
        settings.show_amounts &= self.config.show_amounts();
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SankeyPipeline<S, C> {
    async fn extract(&self) -> Result<BudgetInput> {
        let kind = self.input_kind()?;
        tracing::debug!("Reading {} input from: {}", kind, self.config.input_path());
        let data = self.storage.read_file(self.config.input_path()).await?;

        let (session, mut settings) = match kind.as_str() {
            "csv" => {
                let rows = csv_rows::read_rows(&data)?;
                if rows.is_empty() {
                    return Err(SankeyError::EmptyInput {
                        message: "the CSV file has no rows".to_string(),
                    });
                }
                let mut session = BudgetSession::new();
                session.extend(rows);
                (session, DiagramSettings::default())
            }
            "toml" => {
                let content =
                    String::from_utf8(data).map_err(|e| SankeyError::ConfigValidationError {
                        field: "input".to_string(),
                        message: format!("budget file is not valid UTF-8: {}", e),
                    })?;
                let budget = BudgetFile::from_toml_str(&content)?;
                budget.validate()?;
                (budget.session()?, budget.settings())
            }
            other => {
                return Err(SankeyError::InvalidConfigValueError {
                    field: "input".to_string(),
                    value: self.config.input_path().to_string(),
                    reason: format!("Unsupported input type: {}", other),
                })
            }
        };

        self.apply_overrides(&mut settings);
        Ok(BudgetInput { session, settings })
    }

    async fn transform(&self, input: BudgetInput) -> Result<TransformResult> {
        let graph = input.session.build()?;
        let report = input.session.audit(&graph);

        if self.config.strict() {
            if let Some(first) = report.warnings.first() {
                return Err(SankeyError::StrictAudit {
                    count: report.warnings.len(),
                    first: first.to_string(),
                });
            }
        }

        let payload = SankeyPayload::new(&graph, &report, &input.session, &input.settings);

        Ok(TransformResult {
            graph,
            report,
            payload,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in self.config.output_formats() {
            let (path, data) = match format.as_str() {
                "json" => (
                    self.output_file(JSON_OUTPUT),
                    serde_json::to_vec_pretty(&result.payload)?,
                ),
                "csv" => (
                    self.output_file(CSV_OUTPUT),
                    csv_rows::write_links(&result.graph)?,
                ),
                other => {
                    return Err(SankeyError::InvalidConfigValueError {
                        field: "formats".to_string(),
                        value: other.to_string(),
                        reason: "Valid values: json, csv".to_string(),
                    })
                }
            };

            tracing::debug!("Writing {} ({} bytes)", path, data.len());
            self.storage.write_file(&path, &data).await?;
            written.push(path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FlowError, FlowWarning};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, content: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), content.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                SankeyError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input_path: String,
        output_path: String,
        output_formats: Vec<String>,
        title: Option<String>,
        show_amounts: bool,
        strict: bool,
    }

    impl MockConfig {
        fn new(input_path: &str) -> Self {
            Self {
                input_path: input_path.to_string(),
                output_path: "test_output".to_string(),
                output_formats: vec!["json".to_string()],
                title: None,
                show_amounts: true,
                strict: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn title_override(&self) -> Option<&str> {
            self.title.as_deref()
        }

        fn show_amounts(&self) -> bool {
            self.show_amounts
        }

        fn strict(&self) -> bool {
            self.strict
        }
    }

    const ROWS_CSV: &str = "source,target,amount\n\
        Salary,Budget,3000\n\
        Budget,Rent,1200\n\
        Budget,Groceries,400\n\
        Budget,Groceries,100\n";

    const BUDGET_TOML: &str = r#"
[diagram]
title = "Household"

[[income]]
name = "Salary"
amount = 1000

[[expenses]]
name = "Rent"
amount = 900

[[expenses]]
name = "Travel"
amount = 300
"#;

    #[tokio::test]
    async fn test_extract_csv_rows() {
        let storage = MockStorage::with_file("rows.csv", ROWS_CSV);
        let pipeline = SankeyPipeline::new(storage, MockConfig::new("rows.csv"));

        let input = pipeline.extract().await.unwrap();

        assert_eq!(input.session.len(), 4);
        assert_eq!(input.settings, DiagramSettings::default());
    }

    #[tokio::test]
    async fn test_extract_toml_budget_with_title_override() {
        let storage = MockStorage::with_file("budget.toml", BUDGET_TOML);
        let mut config = MockConfig::new("budget.toml");
        config.title = Some("Override".to_string());
        config.show_amounts = false;
        let pipeline = SankeyPipeline::new(storage, config);

        let input = pipeline.extract().await.unwrap();

        assert_eq!(input.session.len(), 3);
        assert_eq!(input.settings.title, "Override");
        assert!(!input.settings.show_amounts);
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let storage = MockStorage::with_file("other.csv", ROWS_CSV);
        let pipeline = SankeyPipeline::new(storage, MockConfig::new("rows.csv"));

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, SankeyError::IoError(_)));
    }

    #[tokio::test]
    async fn test_extract_header_only_csv_is_empty_input() {
        let storage = MockStorage::with_file("rows.csv", "source,target,amount\n");
        let pipeline = SankeyPipeline::new(storage, MockConfig::new("rows.csv"));

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, SankeyError::EmptyInput { .. }));
    }

    #[tokio::test]
    async fn test_transform_merges_duplicates() {
        let storage = MockStorage::with_file("rows.csv", ROWS_CSV);
        let pipeline = SankeyPipeline::new(storage, MockConfig::new("rows.csv"));

        let input = pipeline.extract().await.unwrap();
        let result = pipeline.transform(input).await.unwrap();

        assert_eq!(result.graph.nodes, vec!["Salary", "Budget", "Rent", "Groceries"]);
        assert_eq!(result.graph.links.len(), 3);
        assert_eq!(result.graph.links[2].amount, 500.0);
        assert_eq!(result.graph.total_flow(), 4700.0);
        assert_eq!(result.report.summary.surplus, 1300.0);
    }

    #[tokio::test]
    async fn test_transform_rejects_cycles() {
        let csv = "source,target,amount\nA,B,5\nB,A,3\n";
        let storage = MockStorage::with_file("rows.csv", csv);
        let pipeline = SankeyPipeline::new(storage, MockConfig::new("rows.csv"));

        let input = pipeline.extract().await.unwrap();
        let err = pipeline.transform(input).await.unwrap_err();

        assert!(matches!(
            err,
            SankeyError::FlowError(FlowError::CycleDetected { .. })
        ));
    }

    #[tokio::test]
    async fn test_strict_mode_fails_on_warnings() {
        let storage = MockStorage::with_file("budget.toml", BUDGET_TOML);

        let lenient = SankeyPipeline::new(storage.clone(), MockConfig::new("budget.toml"));
        let input = lenient.extract().await.unwrap();
        let result = lenient.transform(input).await.unwrap();
        assert!(matches!(
            &result.report.warnings[..],
            [FlowWarning::Overdrawn { .. }]
        ));

        let mut config = MockConfig::new("budget.toml");
        config.strict = true;
        let strict = SankeyPipeline::new(storage, config);
        let input = strict.extract().await.unwrap();
        let err = strict.transform(input).await.unwrap_err();
        assert!(matches!(err, SankeyError::StrictAudit { count: 1, .. }));
    }

    #[tokio::test]
    async fn test_load_writes_json_and_csv() {
        let storage = MockStorage::with_file("rows.csv", ROWS_CSV);
        let mut config = MockConfig::new("rows.csv");
        config.output_formats = vec!["json".to_string(), "csv".to_string()];
        let pipeline = SankeyPipeline::new(storage.clone(), config);

        let input = pipeline.extract().await.unwrap();
        let result = pipeline.transform(input).await.unwrap();
        let written = pipeline.load(result).await.unwrap();

        let json_path = Path::new("test_output").join(JSON_OUTPUT);
        let csv_path = Path::new("test_output").join(CSV_OUTPUT);
        assert_eq!(
            written,
            vec![
                json_path.to_string_lossy().into_owned(),
                csv_path.to_string_lossy().into_owned()
            ]
        );

        let json = storage.get_file(&written[0]).await.unwrap();
        let payload: SankeyPayload = serde_json::from_slice(&json).unwrap();
        assert_eq!(payload.node.name, vec!["Salary", "Budget", "Rent", "Groceries"]);
        assert_eq!(payload.link.value, vec![3000.0, 1200.0, 500.0]);

        let csv = storage.get_file(&written[1]).await.unwrap();
        let csv = String::from_utf8(csv).unwrap();
        assert!(csv.starts_with("source,target,amount\n"));
        assert!(csv.contains("Budget,Groceries,500.0"));
    }
}

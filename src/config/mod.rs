pub mod cli;
pub mod csv_rows;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

pub const INPUT_EXTENSIONS: &[&str] = &["csv", "toml"];
pub const OUTPUT_FORMATS: &[&str] = &["json", "csv"];

#[cfg(feature = "cli")]
mod cli_args {
    use super::{INPUT_EXTENSIONS, OUTPUT_FORMATS};
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "budget-sankey")]
    #[command(about = "Validate budget flows and emit Sankey diagram data")]
    pub struct CliConfig {
        /// Budget rows (.csv with source,target,amount) or a budget file (.toml)
        pub input: String,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, value_delimiter = ',', default_value = "json")]
        pub formats: Vec<String>,

        /// Override the diagram title
        #[arg(long)]
        pub title: Option<String>,

        /// Label nodes with names only
        #[arg(long)]
        pub hide_amounts: bool,

        /// Fail when the audit reports any warning
        #[arg(long)]
        pub strict: bool,

        /// Validate and summarize without writing output
        #[arg(long)]
        pub dry_run: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn title_override(&self) -> Option<&str> {
            self.title.as_deref()
        }

        fn show_amounts(&self) -> bool {
            !self.hide_amounts
        }

        fn strict(&self) -> bool {
            self.strict
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_path("input", &self.input)?;
            validation::validate_file_extension("input", &self.input, INPUT_EXTENSIONS)?;
            validation::validate_path("output_path", &self.output_path)?;
            validation::validate_one_of("formats", &self.formats, OUTPUT_FORMATS)?;
            if let Some(title) = &self.title {
                validation::validate_non_empty_string("title", title)?;
            }
            Ok(())
        }
    }

}

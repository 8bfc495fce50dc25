use budget_sankey::core::TransformResult;
use budget_sankey::utils::format::format_currency;
use budget_sankey::utils::{logger, validation::Validate};
use budget_sankey::{CliConfig, LocalStorage, SankeyEngine, SankeyError, SankeyPipeline};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting budget-sankey");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let dry_run = config.dry_run;
    let pipeline = SankeyPipeline::new(LocalStorage::default(), config);
    let engine = SankeyEngine::new(pipeline);

    if dry_run {
        tracing::info!("DRY RUN - nothing will be written");
        match engine.check().await {
            Ok(result) => print_summary(&result),
            Err(e) => fail(&e),
        }
        return Ok(());
    }

    match engine.run().await {
        Ok(written) => {
            for path in written {
                println!("{}", path);
            }
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn fail(e: &SankeyError) -> ! {
    tracing::error!(
        "budget-sankey failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("{}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn print_summary(result: &TransformResult) {
    let summary = &result.report.summary;

    println!("Nodes: {}", summary.node_count);
    println!("Links: {}", summary.link_count);
    println!("Inflow from sources: {}", format_currency(summary.source_total));
    println!("Outflow to sinks: {}", format_currency(summary.sink_total));
    if summary.surplus < 0.0 {
        println!("Shortfall: {}", format_currency(-summary.surplus));
    } else {
        println!("Unallocated: {}", format_currency(summary.surplus));
    }

    for warning in &result.report.warnings {
        println!("warning: {}", warning);
    }
}

use anyhow::Result;
use clap::Parser;
use image_converter::cli::{execute_convert, Cli, ConvertConfig, ConvertOutcome};
use image_converter::logging::init_logging;
use std::io::IsTerminal;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let request = ConvertConfig {
        input_dir: cli.input_dir.clone(),
        config: cli.to_config(),
        dry_run: cli.dry_run,
        report: cli.report.clone(),
        show_progress: std::io::stderr().is_terminal(),
    };

    match execute_convert(request).await? {
        ConvertOutcome::DryRun(_) => Ok(()),
        ConvertOutcome::Completed(result) if result.total > 0 && result.successes == 0 => {
            anyhow::bail!("All {} conversions failed", result.total)
        }
        ConvertOutcome::Completed(_) => Ok(()),
    }
}

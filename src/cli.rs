use crate::commands::{run_export, run_report, run_score, ExportArgs, ReportArgs, ScoreArgs};
use clap::{Parser, Subcommand};
use eia_assessment::config::AppConfig;
use eia_assessment::error::AppError;
use eia_assessment::telemetry;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "eia",
    about = "Score environmental impact indicators and produce assessment reports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the weighted risk score, level and recommendations
    Score(ScoreArgs),
    /// Compose a paginated PDF report from an assessment file
    Report(ReportArgs),
    /// Export metadata and indicator values as Field,Value CSV
    Export(ExportArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(
        environment = %config.environment.as_str(),
        output_dir = %config.report.output_dir.display(),
        "configuration loaded"
    );

    match cli.command {
        Command::Score(args) => run_score(args),
        Command::Report(args) => run_report(args, &config),
        Command::Export(args) => run_export(args),
    }
}

use chrono::{Local, NaiveDate};
use clap::Args;
use eia_assessment::assessment::{
    write_csv, AssessmentInput, AssessmentRecord, AssessmentSession, IndicatorSet,
    LiveAssessment, WeightTable,
};
use eia_assessment::chart::RadarChartRenderer;
use eia_assessment::config::AppConfig;
use eia_assessment::error::AppError;
use eia_assessment::report::{OutputName, PdfCanvas, ReportComposer, ReportOutcome};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Assessment JSON file; overrides the individual readings below
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i64).range(0..=100))]
    erosion: i64,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i64).range(0..=100))]
    vegetation: i64,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i64).range(0..=100))]
    water_quality: i64,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i64).range(0..=100))]
    habitat_disruption: i64,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i64).range(0..=100))]
    air_quality: i64,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Assessment JSON file (metadata, indicators, activities)
    #[arg(long)]
    input: PathBuf,
    /// Report file name; defaults to EIA_REPORT_NAME. An empty name cancels the run
    #[arg(long)]
    output: Option<String>,
    /// Directory the report is written to; defaults to EIA_OUTPUT_DIR
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Leave the radar chart out of the report
    #[arg(long)]
    no_chart: bool,
    /// Date printed on the report (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Assessment JSON file (metadata, indicators, activities)
    #[arg(long)]
    input: PathBuf,
    /// Destination CSV file
    #[arg(long)]
    output: PathBuf,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let indicators = match &args.input {
        Some(path) => read_input(path)?.indicators,
        None => IndicatorSet::new(
            args.erosion,
            args.vegetation,
            args.water_quality,
            args.habitat_disruption,
            args.air_quality,
        )?,
    };

    let live = LiveAssessment::evaluate(&indicators, &WeightTable::canonical());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&live)?);
    } else {
        render_assessment(&indicators, &live);
    }
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs, config: &AppConfig) -> Result<(), AppError> {
    let ReportArgs {
        input,
        output,
        output_dir,
        no_chart,
        today,
    } = args;

    let assessment = read_input(&input)?;
    let mut session = AssessmentSession::new(
        assessment,
        WeightTable::canonical(),
        RadarChartRenderer::default(),
    );
    if no_chart {
        session.clear_chart();
    }

    let live = session.assessment();
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let name = OutputName::Named(output.unwrap_or_else(|| config.report.default_name.clone()));
    let output_dir = output_dir.unwrap_or_else(|| config.report.output_dir.clone());

    let composer = ReportComposer::new(config.report.layout, config.report.attribution.clone());
    let outcome = composer.generate(
        name,
        &session.report_input(&live, today),
        &output_dir,
        PdfCanvas::new,
    )?;

    match outcome {
        ReportOutcome::Saved { path, pages } => {
            println!(
                "Report saved to {} ({} page{})",
                path.display(),
                pages,
                if pages == 1 { "" } else { "s" }
            );
        }
        ReportOutcome::Cancelled => println!("Report generation cancelled; nothing was written."),
        ReportOutcome::Busy => println!("A report is already being generated; request ignored."),
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let assessment = read_input(&args.input)?;
    let live = LiveAssessment::evaluate(&assessment.indicators, &WeightTable::canonical());

    let file = File::create(&args.output)?;
    write_csv(
        BufWriter::new(file),
        &AssessmentRecord {
            metadata: &assessment.metadata,
            indicators: &assessment.indicators,
            assessment: &live.assessment,
        },
    )?;

    info!(path = %args.output.display(), "csv export written");
    println!("CSV exported to {}", args.output.display());
    Ok(())
}

fn read_input(path: &Path) -> Result<AssessmentInput, AppError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn render_assessment(indicators: &IndicatorSet, live: &LiveAssessment) {
    println!("Environmental impact assessment");
    for (indicator, reading) in indicators.iter() {
        println!("  {:<20} {:>3}", indicator.label(), reading);
    }

    let assessment = &live.assessment;
    println!(
        "Risk score: {} ({}, {})",
        assessment.score,
        assessment.level.display_label(),
        assessment.level.color().hex()
    );

    println!("Recommendations:");
    for recommendation in &live.recommendations {
        if recommendation.is_sentinel() {
            println!("  {}", recommendation.message);
        } else {
            println!("  - {}", recommendation.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(
            parse_date(" 2025-03-14 "),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date"))
        );
        assert!(parse_date("14/03/2025").is_err());
    }

    #[test]
    fn read_input_validates_indicators() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("assessment.json");
        std::fs::write(
            &path,
            r#"{"indicators":{"erosion":101,"vegetation":0,"waterQuality":0,"habitatDisruption":0,"airQuality":0}}"#,
        )
        .expect("write fixture");

        let err = read_input(&path).expect_err("out of range reading");
        assert!(matches!(err, AppError::Input(_)));
    }
}

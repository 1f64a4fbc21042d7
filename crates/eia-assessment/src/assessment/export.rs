use super::domain::{IndicatorSet, MetadataField, ProjectMetadata};
use super::scoring::RiskAssessment;
use std::io::Write;

/// Flat `Field,Value` view of an assessment for spreadsheet tooling.
#[derive(Debug, Clone, Copy)]
pub struct AssessmentRecord<'a> {
    pub metadata: &'a ProjectMetadata,
    pub indicators: &'a IndicatorSet,
    pub assessment: &'a RiskAssessment,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV export: {0}")]
    Io(#[from] std::io::Error),
}

pub fn write_csv<W: Write>(writer: W, record: &AssessmentRecord<'_>) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Field", "Value"])?;

    for field in MetadataField::ordered() {
        csv_writer.write_record([field.label(), record.metadata.display(field)])?;
    }

    for (indicator, reading) in record.indicators.iter() {
        csv_writer.write_record([indicator.label(), reading.to_string().as_str()])?;
    }

    let score = record.assessment.score.to_string();
    csv_writer.write_record(["Risk Score", score.as_str()])?;
    csv_writer.write_record(["Risk Level", record.assessment.level.display_label()])?;

    csv_writer.flush()?;
    Ok(())
}

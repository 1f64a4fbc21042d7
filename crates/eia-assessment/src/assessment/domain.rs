use serde::{Deserialize, Serialize};

/// Placeholder rendered for any metadata field the assessor left blank.
pub const NOT_AVAILABLE: &str = "N/A";

pub const INDICATOR_MIN: u8 = 0;
pub const INDICATOR_MAX: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Indicator {
    Erosion,
    Vegetation,
    WaterQuality,
    HabitatDisruption,
    AirQuality,
}

impl Indicator {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Erosion,
            Self::Vegetation,
            Self::WaterQuality,
            Self::HabitatDisruption,
            Self::AirQuality,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Erosion => "erosion",
            Self::Vegetation => "vegetation",
            Self::WaterQuality => "waterQuality",
            Self::HabitatDisruption => "habitatDisruption",
            Self::AirQuality => "airQuality",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Erosion => "Erosion",
            Self::Vegetation => "Vegetation Damage",
            Self::WaterQuality => "Water Quality",
            Self::HabitatDisruption => "Habitat Disruption",
            Self::AirQuality => "Air Quality",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Erosion => 0,
            Self::Vegetation => 1,
            Self::WaterQuality => 2,
            Self::HabitatDisruption => 3,
            Self::AirQuality => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndicatorError {
    #[error("{} reading {value} is outside 0..=100", .indicator.key())]
    OutOfRange { indicator: Indicator, value: i64 },
}

/// The five indicator readings, each guaranteed to sit within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawIndicators", into = "RawIndicators")]
pub struct IndicatorSet {
    values: [u8; 5],
}

impl IndicatorSet {
    pub fn new(
        erosion: i64,
        vegetation: i64,
        water_quality: i64,
        habitat_disruption: i64,
        air_quality: i64,
    ) -> Result<Self, IndicatorError> {
        let raw = [
            erosion,
            vegetation,
            water_quality,
            habitat_disruption,
            air_quality,
        ];
        let mut values = [0u8; 5];
        for (indicator, value) in Indicator::ordered().into_iter().zip(raw) {
            values[indicator.index()] = validate(indicator, value)?;
        }
        Ok(Self { values })
    }

    /// Every indicator set to the same reading.
    pub fn uniform(value: i64) -> Result<Self, IndicatorError> {
        Self::new(value, value, value, value, value)
    }

    pub fn get(&self, indicator: Indicator) -> u8 {
        self.values[indicator.index()]
    }

    pub fn with(mut self, indicator: Indicator, value: i64) -> Result<Self, IndicatorError> {
        self.values[indicator.index()] = validate(indicator, value)?;
        Ok(self)
    }

    /// Readings paired with their indicator, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Indicator, u8)> + '_ {
        Indicator::ordered()
            .into_iter()
            .map(move |indicator| (indicator, self.get(indicator)))
    }
}

fn validate(indicator: Indicator, value: i64) -> Result<u8, IndicatorError> {
    if (i64::from(INDICATOR_MIN)..=i64::from(INDICATOR_MAX)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(IndicatorError::OutOfRange { indicator, value })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIndicators {
    erosion: i64,
    vegetation: i64,
    water_quality: i64,
    habitat_disruption: i64,
    air_quality: i64,
}

impl TryFrom<RawIndicators> for IndicatorSet {
    type Error = IndicatorError;

    fn try_from(raw: RawIndicators) -> Result<Self, Self::Error> {
        IndicatorSet::new(
            raw.erosion,
            raw.vegetation,
            raw.water_quality,
            raw.habitat_disruption,
            raw.air_quality,
        )
    }
}

impl From<IndicatorSet> for RawIndicators {
    fn from(set: IndicatorSet) -> Self {
        RawIndicators {
            erosion: set.get(Indicator::Erosion).into(),
            vegetation: set.get(Indicator::Vegetation).into(),
            water_quality: set.get(Indicator::WaterQuality).into(),
            habitat_disruption: set.get(Indicator::HabitatDisruption).into(),
            air_quality: set.get(Indicator::AirQuality).into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataSection {
    ProjectDetails,
    SiteInformation,
}

impl MetadataSection {
    pub const fn title(self) -> &'static str {
        match self {
            Self::ProjectDetails => "Project Details",
            Self::SiteInformation => "Site Information",
        }
    }

    pub const fn fields(self) -> &'static [MetadataField] {
        match self {
            Self::ProjectDetails => &[
                MetadataField::ProjectName,
                MetadataField::Location,
                MetadataField::AssessorName,
                MetadataField::AssessmentDate,
                MetadataField::ProjectDescription,
                MetadataField::ProjectPurpose,
                MetadataField::TypeOfWorks,
            ],
            Self::SiteInformation => &[
                MetadataField::FloraFauna,
                MetadataField::SoilTypes,
                MetadataField::Waterways,
                MetadataField::BiosecurityMeasures,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    ProjectName,
    Location,
    AssessorName,
    AssessmentDate,
    ProjectDescription,
    ProjectPurpose,
    TypeOfWorks,
    FloraFauna,
    SoilTypes,
    Waterways,
    BiosecurityMeasures,
}

impl MetadataField {
    pub const fn ordered() -> [Self; 11] {
        [
            Self::ProjectName,
            Self::Location,
            Self::AssessorName,
            Self::AssessmentDate,
            Self::ProjectDescription,
            Self::ProjectPurpose,
            Self::TypeOfWorks,
            Self::FloraFauna,
            Self::SoilTypes,
            Self::Waterways,
            Self::BiosecurityMeasures,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ProjectName => "Project Name",
            Self::Location => "Location",
            Self::AssessorName => "Assessor Name",
            Self::AssessmentDate => "Date of Assessment",
            Self::ProjectDescription => "Project Description",
            Self::ProjectPurpose => "Project Purpose",
            Self::TypeOfWorks => "Type of Works",
            Self::FloraFauna => "Flora & Fauna",
            Self::SoilTypes => "Soil Types",
            Self::Waterways => "Waterways",
            Self::BiosecurityMeasures => "Biosecurity Measures",
        }
    }
}

/// Free-text project fields captured alongside the indicator readings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub project_name: String,
    pub location: String,
    pub assessor_name: String,
    pub assessment_date: String,
    pub project_description: String,
    pub project_purpose: String,
    pub type_of_works: String,
    pub flora_fauna: String,
    pub soil_types: String,
    pub waterways: String,
    pub biosecurity_measures: String,
}

impl ProjectMetadata {
    pub fn raw(&self, field: MetadataField) -> &str {
        match field {
            MetadataField::ProjectName => &self.project_name,
            MetadataField::Location => &self.location,
            MetadataField::AssessorName => &self.assessor_name,
            MetadataField::AssessmentDate => &self.assessment_date,
            MetadataField::ProjectDescription => &self.project_description,
            MetadataField::ProjectPurpose => &self.project_purpose,
            MetadataField::TypeOfWorks => &self.type_of_works,
            MetadataField::FloraFauna => &self.flora_fauna,
            MetadataField::SoilTypes => &self.soil_types,
            MetadataField::Waterways => &self.waterways,
            MetadataField::BiosecurityMeasures => &self.biosecurity_measures,
        }
    }

    /// Field value for display, with blanks replaced by `N/A`.
    pub fn display(&self, field: MetadataField) -> &str {
        let value = self.raw(field).trim();
        if value.is_empty() {
            NOT_AVAILABLE
        } else {
            value
        }
    }
}

/// One entry of the optional activities checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    #[serde(default)]
    pub selected: bool,
}

impl Activity {
    pub fn new(name: impl Into<String>, selected: bool) -> Self {
        Self {
            name: name.into(),
            selected,
        }
    }

    pub fn checklist_line(&self) -> String {
        let mark = if self.selected { 'X' } else { ' ' };
        format!("[{mark}] {}", self.name)
    }
}

/// Everything the assessor supplies for one assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentInput {
    #[serde(default)]
    pub metadata: ProjectMetadata,
    pub indicators: IndicatorSet,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

use crate::report::PageLayout;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub report: ReportConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("EIA_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let output_dir =
            PathBuf::from(env::var("EIA_OUTPUT_DIR").unwrap_or_else(|_| ".".to_string()));
        if output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }

        let default_name =
            env::var("EIA_REPORT_NAME").unwrap_or_else(|_| DEFAULT_REPORT_NAME.to_string());
        if default_name.trim().is_empty() {
            return Err(ConfigError::EmptyReportName);
        }

        let attribution =
            env::var("EIA_FOOTER_TEXT").unwrap_or_else(|_| DEFAULT_ATTRIBUTION.to_string());

        let log_level = env::var("EIA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            report: ReportConfig {
                output_dir,
                default_name: default_name.trim().to_string(),
                attribution,
                layout: PageLayout::a4(),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

pub const DEFAULT_REPORT_NAME: &str = "EIA_Report";
pub const DEFAULT_ATTRIBUTION: &str = "Environmental Impact Assessment";

/// Where and how reports are written.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub default_name: String,
    pub attribution: String,
    pub layout: PageLayout,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyOutputDir,
    EmptyReportName,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyOutputDir => write!(f, "EIA_OUTPUT_DIR must not be empty"),
            ConfigError::EmptyReportName => write!(f, "EIA_REPORT_NAME must not be blank"),
        }
    }
}

impl std::error::Error for ConfigError {}

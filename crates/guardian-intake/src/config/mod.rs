use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
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
}

pub const DEFAULT_JOTFORM_API_URL: &str = "https://api.jotform.com";
pub const DEFAULT_FIELD_MAPPING_PATH: &str = "config/stage1-field-mapping.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub jotform: JotformSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            jotform: JotformSettings::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Vendor credentials, form identifiers, and the location of the reviewed field mapping.
#[derive(Clone)]
pub struct JotformSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub forms: FormIds,
    pub field_mapping_path: PathBuf,
    pub timeout: Duration,
}

impl JotformSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let api_url = env::var("JOTFORM_API_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_JOTFORM_API_URL.to_string());
        let api_key = non_empty_var("JOTFORM_API_KEY");

        let timeout_secs = match env::var("JOTFORM_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout)?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let field_mapping_path = env::var("JOTFORM_FIELD_MAPPING")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_FIELD_MAPPING_PATH));

        Ok(Self {
            api_url,
            api_key,
            forms: FormIds {
                stage1: non_empty_var("JOTFORM_FORM_ID_STAGE1"),
                stage2: non_empty_var("JOTFORM_FORM_ID_STAGE2"),
                stage3: non_empty_var("JOTFORM_FORM_ID_STAGE3"),
            },
            field_mapping_path,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Settings pointing at an arbitrary base URL, used by tooling and tests.
    pub fn for_base_url(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: Some(api_key.into()),
            forms: FormIds::default(),
            field_mapping_path: PathBuf::from(DEFAULT_FIELD_MAPPING_PATH),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

}

impl fmt::Debug for JotformSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JotformSettings")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("forms", &self.forms)
            .field("field_mapping_path", &self.field_mapping_path)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Jotform form ids for the three hiring stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormIds {
    /// Public clinician application.
    pub stage1: Option<String>,
    /// Conditional-offer onboarding.
    pub stage2: Option<String>,
    /// Confidential medical clearance.
    pub stage3: Option<String>,
}

impl FormIds {
    pub fn require_stage1(&self) -> Result<&str, ConfigError> {
        self.require(HiringStage::Application)
    }

    pub fn require(&self, stage: HiringStage) -> Result<&str, ConfigError> {
        let form_id = match stage {
            HiringStage::Application => &self.stage1,
            HiringStage::Onboarding => &self.stage2,
            HiringStage::MedicalClearance => &self.stage3,
        };
        form_id
            .as_deref()
            .ok_or(ConfigError::MissingFormId(stage.form_id_var()))
    }
}

/// Hiring stage whose Jotform form an operation targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HiringStage {
    #[default]
    Application,
    Onboarding,
    MedicalClearance,
}

impl HiringStage {
    pub fn form_id_var(self) -> &'static str {
        match self {
            HiringStage::Application => "JOTFORM_FORM_ID_STAGE1",
            HiringStage::Onboarding => "JOTFORM_FORM_ID_STAGE2",
            HiringStage::MedicalClearance => "JOTFORM_FORM_ID_STAGE3",
        }
    }
}

impl std::str::FromStr for HiringStage {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "application" => Ok(HiringStage::Application),
            "2" | "onboarding" => Ok(HiringStage::Onboarding),
            "3" | "medical" | "medical-clearance" => Ok(HiringStage::MedicalClearance),
            other => Err(format!(
                "unknown hiring stage '{other}'; expected 1, 2 or 3"
            )),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    MissingApiKey,
    MissingFormId(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "JOTFORM_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::MissingApiKey => {
                write!(f, "Jotform API key not configured; set JOTFORM_API_KEY")
            }
            ConfigError::MissingFormId(var) => write!(f, "Form ID is required; set {var}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTimeout
            | ConfigError::MissingApiKey
            | ConfigError::MissingFormId(_) => None,
        }
    }
}

pub mod agrn;
pub mod app_config;
pub mod area_filter;
pub mod config;
pub mod record;
pub mod validate;

pub use agrn::{normalize_agrn, strip_agrn};
pub use app_config::AppConfig;
pub use area_filter::{load_area_filter, parse_area_filter, AreaFilter};
pub use config::{load_app_config, load_app_config_from_env};
pub use record::{AgdrpPayment, AssistanceDetails, DisasterRecord, DisasterType, StateCode};
pub use validate::{validate_record, ValidatedRecord, ValidationError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read area filter file {path}: {source}")]
    AreaFilterIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse area filter file: {0}")]
    AreaFilterParse(#[from] serde_yaml::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

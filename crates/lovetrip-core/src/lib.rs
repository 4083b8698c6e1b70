//! Shared configuration and domain types for the LoveTrip data pipeline.

use thiserror::Error;

mod app_config;
mod config;
pub mod courses;
pub mod places;
pub mod regions;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use courses::{derive_course_summary, CourseSummary};
pub use places::{infer_course_types, ContentType, CourseType, NewPlace, PlaceCategory};
pub use regions::{area_name, Area, AREAS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

pub mod cluster;
pub mod config;
pub mod error;
pub mod name_service;
pub mod targets;
pub mod thread_dump;
pub mod version;

pub use config::{BytesUnit, ColorMode, CohctlConfig, ConnectionRecord, ProfileRecord};
pub use error::AppError;
pub use name_service::Endpoint;
pub use targets::NodeSelection;
pub use version::{Version, is_version_update_available};

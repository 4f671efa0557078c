pub mod config_store;
pub mod http_fetcher;
pub mod logging;
pub mod name_service_tcp;
pub mod release_lookup;

pub use config_store::{ConfigStore, default_config_dir};
pub use http_fetcher::{HttpFetcherFactory, HttpSettings, PasswordSource};
pub use name_service_tcp::TcpNameServiceClient;
pub use release_lookup::{LATEST_RELEASE_URL, fetch_latest_version};

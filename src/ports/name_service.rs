use crate::domain::{AppError, Endpoint};

/// Port for name service lookups against a cluster's discovery port.
pub trait NameServiceLookup {
    /// Send `query` to `endpoint` and return the text result.
    fn lookup(&self, endpoint: &Endpoint, query: &str) -> Result<String, AppError>;
}

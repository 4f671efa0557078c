//! cohctl: inspect, tune and operate Coherence clusters through their management endpoint.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::cli::run;
pub use domain::AppError;

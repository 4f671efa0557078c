//! `version` and the optional update check.

use std::env::consts::{ARCH, OS};

use crate::domain::config::binary_version;
use crate::domain::{AppError, is_version_update_available};

pub fn version_text() -> String {
    format!("cohctl version: {}\nOS/Arch:        {OS}/{ARCH}\n", binary_version())
}

/// Version details, followed by the update check result when `latest` is given.
///
/// A failed check is reported in the output rather than failing the command.
pub fn show_version<F>(latest: Option<F>) -> String
where
    F: FnOnce() -> Result<String, AppError>,
{
    let mut out = version_text();
    let Some(latest) = latest else {
        return out;
    };
    match latest() {
        Ok(latest) if is_version_update_available(binary_version(), &latest) => {
            out.push_str(&format!(
                "\nA newer version of cohctl is available: {latest}\n\
                 Download it from https://github.com/oracle/coherence-cli/releases\n"
            ));
        }
        Ok(_) => out.push_str("\nYou are running the latest version of cohctl\n"),
        Err(err) => {
            tracing::warn!(error = %err, "update check failed");
            out.push_str(&format!("\nunable to check for updates: {err}\n"));
        }
    }
    out
}

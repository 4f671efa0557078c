//! `describe cluster`: details, members and services in one view.

use crate::app::AppContext;
use crate::app::commands::members::members_summary;
use crate::app::commands::services::services_table;
use crate::app::commands::{combine, decode_members, decode_services};
use crate::app::format::format_json_for_describe;
use crate::domain::AppError;
use crate::ports::Query;

const CLUSTER_PRIMARY_LABELS: &[&str] = &["clusterName", "version", "clusterSize", "running"];

pub fn describe_cluster(ctx: &AppContext, name: &str) -> Result<String, AppError> {
    let connection = ctx
        .store()
        .config()
        .find_cluster(name)
        .ok_or_else(|| AppError::not_found(format!("unable to find cluster connection '{name}'")))?;
    let fetcher = ctx.fetcher_for(connection)?;

    let details = fetcher.query(&Query::ClusterDetails)?;
    let members = fetcher.query(&Query::Members)?;
    let services = fetcher.query(&Query::Services)?;
    let document = combine(vec![
        ("cluster", details.as_slice()),
        ("members", members.as_slice()),
        ("services", services.as_slice()),
    ])?;

    ctx.output().render_value(&document, || {
        let wide = ctx.output().is_wide();
        let mut out = String::from("CLUSTER\n-------\n");
        out.push_str(&format_json_for_describe(&details, CLUSTER_PRIMARY_LABELS)?);
        out.push_str("\nMEMBERS\n-------\n");
        out.push_str(&members_summary(&decode_members(&members)?, ctx.bytes_unit(), wide)?);
        out.push_str("\nSERVICES\n--------\n");
        out.push_str(&services_table(&decode_services(&services, None)?, wide)?);
        Ok(out)
    })
}

//! Member health checks.

use std::collections::BTreeMap;

use crate::app::AppContext;
use crate::app::format::{FormattedTable, L, R};
use crate::domain::AppError;
use crate::domain::cluster::{HEALTH_KEY, HealthCheck, decode_collection};
use crate::ports::Query;

/// `summary` collapses the per-member rows into one row per check name.
pub fn get_health(ctx: &AppContext, summary: bool) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let raw = fetcher.query(&Query::Health)?;
    ctx.output().render(&raw, || {
        let mut checks: Vec<HealthCheck> = decode_collection(&raw, HEALTH_KEY)?;
        checks.sort_by(|a, b| (&a.name, a.node_id).cmp(&(&b.name, b.node_id)));
        let healthy = checks.iter().filter(|c| c.is_healthy()).count();
        let mut out = format!("Health checks passing: {healthy} of {}\n\n", checks.len());
        out.push_str(&if summary { summary_table(&checks)? } else { detail_table(&checks)? });
        Ok(out)
    })
}

fn detail_table(checks: &[HealthCheck]) -> Result<String, AppError> {
    let mut table = FormattedTable::new()
        .with_alignment(&[L, L, R, L, L, L, L])
        .with_header(&["NAME", "SUB TYPE", "NODE ID", "STARTED", "LIVE", "READY", "SAFE"]);
    for c in checks {
        table.add_row(vec![
            c.name.clone(),
            c.sub_type.clone(),
            c.node_id.to_string(),
            c.started.to_string(),
            c.live.to_string(),
            c.ready.to_string(),
            c.safe.to_string(),
        ])?;
    }
    Ok(table.render())
}

fn summary_table(checks: &[HealthCheck]) -> Result<String, AppError> {
    let mut grouped: BTreeMap<&str, [usize; 5]> = BTreeMap::new();
    for c in checks {
        let counts = grouped.entry(c.name.as_str()).or_default();
        counts[0] += 1;
        for (slot, passed) in [c.started, c.live, c.ready, c.safe].into_iter().enumerate() {
            if passed {
                counts[slot + 1] += 1;
            }
        }
    }
    let mut table = FormattedTable::new()
        .with_alignment(&[L, R, R, R, R, R])
        .with_header(&["NAME", "MEMBERS", "STARTED", "LIVE", "READY", "SAFE"]);
    for (name, counts) in grouped {
        let mut row = vec![name.to_string()];
        row.extend(counts.iter().map(usize::to_string));
        table.add_row(row)?;
    }
    Ok(table.render())
}

//! Elastic data journals.

use crate::app::AppContext;
use crate::app::commands::{OPERATION_COMPLETED, mutate_nodes, plural};
use crate::app::format::units::{format_bytes, format_large_integer};
use crate::app::format::{FormattedTable, R};
use crate::domain::cluster::{JOURNALS_KEY, Journal, decode_collection};
use crate::domain::{AppError, NodeSelection};
use crate::ports::{Fetcher, JournalType, Mutation, Query};

fn fetch_journals(
    fetcher: &dyn Fetcher,
    journal: JournalType,
) -> Result<(Vec<u8>, Vec<Journal>), AppError> {
    let raw = fetcher.query(&Query::ElasticData { journal })?;
    let mut journals: Vec<Journal> = decode_collection(&raw, JOURNALS_KEY)?;
    journals.sort_by_key(|j| j.node_id);
    Ok((raw, journals))
}

pub fn get_elastic_data(ctx: &AppContext, journal: JournalType) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let (raw, journals) = fetch_journals(fetcher.as_ref(), journal)?;
    ctx.output().render(&raw, || {
        let unit = ctx.bytes_unit();
        let mut out = format!("Journal type: {}\n\n", journal.as_str());
        let mut table = FormattedTable::new()
            .with_alignment(&[R, R, R, R, R, R, R])
            .with_header(&[
                "NODE ID",
                "FILES",
                "DATA SIZE",
                "MAX FILE",
                "COMPACTIONS",
                "EXHAUSTIVE",
                "LOAD FACTOR",
            ]);
        for j in journals {
            table.add_row(vec![
                j.node_id.to_string(),
                j.file_count.to_string(),
                format_bytes(j.total_data_size, unit),
                format_bytes(j.max_file_size, unit),
                format_large_integer(j.compaction_count),
                format_large_integer(j.exhaustive_compaction_count),
                format!("{:.4}", j.highest_load_factor),
            ])?;
        }
        out.push_str(&table.render());
        Ok(out)
    })
}

pub fn compact_elastic_data(
    ctx: &AppContext,
    journal: JournalType,
    selection: &NodeSelection,
    yes: bool,
) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let (_, journals) = fetch_journals(fetcher.as_ref(), journal)?;
    let ids: Vec<i32> = journals.iter().map(|j| j.node_id).collect();
    let nodes = selection.resolve(&ids)?;
    ctx.confirm(
        yes,
        &format!(
            "Are you sure you want to compact {} journals for {}?",
            journal.as_str(),
            plural(nodes.len(), "node")
        ),
    )?;
    mutate_nodes(fetcher.as_ref(), &nodes, |node_id| Mutation::CompactElasticData {
        journal,
        node_id,
    })?;
    Ok(OPERATION_COMPLETED.to_string())
}

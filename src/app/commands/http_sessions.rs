use crate::app::AppContext;
use crate::app::format::units::{format_bytes, format_large_integer};
use crate::app::format::{FormattedTable, L, R};
use crate::domain::AppError;
use crate::domain::cluster::{HttpSession, SESSIONS_KEY, decode_collection};
use crate::ports::Query;

pub fn get_http_sessions(ctx: &AppContext) -> Result<String, AppError> {
    let fetcher = ctx.fetcher()?;
    let raw = fetcher.query(&Query::HttpSessions)?;
    ctx.output().render(&raw, || {
        let mut sessions: Vec<HttpSession> = decode_collection(&raw, SESSIONS_KEY)?;
        sessions.sort_by(|a, b| (&a.app_id, a.node_id).cmp(&(&b.app_id, b.node_id)));
        let unit = ctx.bytes_unit();
        let mut table = FormattedTable::new()
            .with_alignment(&[L, R, L, L, R, R, R])
            .with_header(&[
                "APPLICATION",
                "NODE ID",
                "TYPE",
                "SESSION CACHE",
                "TIMEOUT",
                "AVG SIZE",
                "UPDATES",
            ]);
        for s in sessions {
            table.add_row(vec![
                s.app_id,
                s.node_id.to_string(),
                s.session_type,
                s.session_cache_name,
                s.session_timeout.to_string(),
                format_bytes(s.session_average_size, unit),
                format_large_integer(s.session_updates),
            ])?;
        }
        Ok(table.render())
    })
}

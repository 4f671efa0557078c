//! Thread-dump capture across members.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::app::AppContext;
use crate::app::commands::{member_ids, plural};
use crate::app::fanout::fan_out_repeated;
use crate::app::format::units::format_connection_millis;
use crate::domain::thread_dump::{thread_dump_file_name, unmarshal_thread_dump};
use crate::domain::{AppError, NodeSelection};
use crate::ports::Query;

/// Minimum pause between successive dumps of the same member.
pub const MIN_DUMP_DELAY_SECS: u64 = 5;
/// Member count at which capture is flagged as load-heavy.
const EXCESSIVE_LOAD_MEMBERS: usize = 4;

#[derive(Debug, Clone)]
pub struct ThreadDumpRequest<'a> {
    pub selection: &'a NodeSelection,
    pub output_dir: &'a Path,
    pub iterations: u32,
    pub delay_secs: u64,
}

pub fn retrieve_thread_dumps(
    ctx: &AppContext,
    request: &ThreadDumpRequest<'_>,
    yes: bool,
) -> Result<String, AppError> {
    validate_output_dir(request.output_dir)?;
    if request.iterations < 1 {
        return Err(AppError::invalid("number of thread dumps must be at least 1"));
    }
    if request.delay_secs < MIN_DUMP_DELAY_SECS {
        return Err(AppError::invalid(format!(
            "delay between thread dumps must be at least {MIN_DUMP_DELAY_SECS} seconds"
        )));
    }

    let estimate = u64::from(request.iterations - 1)
        .checked_mul(request.delay_secs)
        .and_then(|secs| secs.checked_mul(1000))
        .and_then(|millis| i64::try_from(millis).ok())
        .ok_or_else(|| {
            AppError::invalid(format!(
                "{} thread dumps {} seconds apart is out of range",
                request.iterations, request.delay_secs
            ))
        })?;

    let fetcher = ctx.fetcher()?;
    let nodes = request.selection.resolve(&member_ids(fetcher.as_ref())?)?;

    let mut prompt = String::new();
    if nodes.len() >= EXCESSIVE_LOAD_MEMBERS {
        prompt.push_str(&format!(
            "WARNING: retrieving thread dumps for {} may cause excessive load on the cluster.\n",
            plural(nodes.len(), "member")
        ));
    }
    prompt.push_str(&format!(
        "This operation will take at least {} and write {} to {}.\nAre you sure you want to retrieve {} per member for {}?",
        format_connection_millis(estimate),
        plural(nodes.len() * request.iterations as usize, "file"),
        request.output_dir.display(),
        plural(request.iterations as usize, "thread dump"),
        plural(nodes.len(), "member"),
    ));
    ctx.confirm(yes, &prompt)?;

    let total = nodes.len() * request.iterations as usize;
    let completed = AtomicUsize::new(0);
    let fetcher = fetcher.as_ref();
    let sink = fan_out_repeated(
        &nodes,
        request.iterations,
        Duration::from_secs(request.delay_secs),
        |node_id, iteration| {
            let raw = fetcher.query(&Query::ThreadDump { node_id: *node_id })?;
            let body = unmarshal_thread_dump(&raw)?;
            let path = request.output_dir.join(thread_dump_file_name(*node_id, iteration));
            fs::write(&path, body)?;
            tracing::debug!(node_id, iteration, path = %path.display(), "thread dump written");
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&format!("Completed {done} of {total}"));
            Ok(())
        },
    );
    progress_done();
    sink.into_result()?;
    Ok(format!("All thread dumps completed and written to {}\n", request.output_dir.display()))
}

fn validate_output_dir(dir: &Path) -> Result<(), AppError> {
    let metadata = fs::metadata(dir).map_err(|_| {
        AppError::invalid(format!("directory {} does not exist", dir.display()))
    })?;
    if !metadata.is_dir() {
        return Err(AppError::invalid(format!("{} is not a directory", dir.display())));
    }
    if metadata.permissions().readonly() {
        return Err(AppError::invalid(format!("directory {} is not writable", dir.display())));
    }
    Ok(())
}

/// Single-line progress on POSIX terminals, plain lines on Windows.
fn progress(message: &str) {
    let mut out = io::stdout().lock();
    let _ = if cfg!(windows) {
        writeln!(out, "{message}")
    } else {
        write!(out, "\x1b[G\x1b[K{message}").and_then(|_| out.flush())
    };
}

fn progress_done() {
    if !cfg!(windows) {
        println!();
    }
}

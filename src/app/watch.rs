//! Repeat-and-refresh loop for read verbs.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

use crate::domain::AppError;

const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Watch settings from the global flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    pub enabled: bool,
    pub clear: bool,
    pub delay: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self { enabled: false, clear: false, delay: Duration::from_secs(5) }
    }
}

impl WatchOptions {
    /// `--watch-clear` implies `--watch`. The delay must be at least one second.
    pub fn new(watch: bool, clear: bool, delay_secs: i32) -> Result<Self, AppError> {
        if delay_secs < 1 {
            return Err(AppError::invalid(format!(
                "delay must be at least 1 second, not {delay_secs}"
            )));
        }
        Ok(Self {
            enabled: watch || clear,
            clear,
            delay: Duration::from_secs(delay_secs.unsigned_abs().into()),
        })
    }

    pub fn disabled(self) -> Self {
        Self { enabled: false, ..self }
    }
}

/// Install a Ctrl-C handler that sets the returned flag.
pub fn interrupt_flag() -> Result<Arc<AtomicBool>, AppError> {
    let stop = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?;
    Ok(stop)
}

/// Print `frame` once, or repeatedly until `stop` is set when watching.
///
/// Each watched frame is fully rendered before anything is written, so an
/// interrupt never leaves a partial frame on screen.
pub fn run_watch<W, F>(
    options: WatchOptions,
    stop: &AtomicBool,
    out: &mut W,
    mut frame: F,
) -> Result<(), AppError>
where
    W: Write,
    F: FnMut() -> Result<String, AppError>,
{
    if !options.enabled {
        out.write_all(frame()?.as_bytes())?;
        return Ok(out.flush()?);
    }

    let mut first = true;
    while !stop.load(Ordering::SeqCst) {
        let body = frame()?;
        if stop.load(Ordering::SeqCst) {
            break;
        }
        if options.clear && !first {
            execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        write!(out, "{timestamp}\n\n{body}\n")?;
        out.flush()?;
        first = false;
        interruptible_sleep(options.delay, stop);
    }
    Ok(())
}

/// Sleep for `duration`, waking early once `stop` is set.
pub fn interruptible_sleep(duration: Duration, stop: &AtomicBool) {
    let deadline = Instant::now() + duration;
    loop {
        if stop.load(Ordering::SeqCst) {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep(SLEEP_SLICE.min(deadline - now));
    }
}

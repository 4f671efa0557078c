pub mod cli;
pub mod commands;
mod confirm;
mod context;
pub mod fanout;
pub mod format;
pub mod output;
pub mod watch;

pub use context::{AppContext, GlobalOptions};

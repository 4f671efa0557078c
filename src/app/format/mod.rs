pub mod describe;
pub mod table;
pub mod units;

pub use describe::{create_camel_case_label, format_json_for_describe, render_pairs};
pub use table::{Alignment, FormattedTable, L, R};

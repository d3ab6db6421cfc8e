pub mod check;

pub use check::{render_report, run_check, CheckConfig, CheckReport};

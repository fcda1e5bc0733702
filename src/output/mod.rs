//! Report formatting.

mod terminal;

pub use terminal::format_report;

//! MySQL-backed tools.

pub mod list_table_stats;

pub use list_table_stats::{ListTableStatsConfig, ListTableStatsTool};

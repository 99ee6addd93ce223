//! Readers for fragment dumps produced by external recognizers.

pub mod csv_dump;
pub mod json_dump;

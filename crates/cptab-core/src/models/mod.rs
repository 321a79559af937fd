//! Data models for records, the record table and configuration.

pub mod config;
pub mod record;
pub mod table;

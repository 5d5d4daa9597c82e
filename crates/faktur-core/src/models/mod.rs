//! Data models: the extracted record and pipeline configuration.

pub mod config;
pub mod record;

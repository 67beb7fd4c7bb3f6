//! Data models.

pub mod config;
pub mod status;

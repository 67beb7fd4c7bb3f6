//! Core business logic modules.

pub mod retry;
pub mod shutdown;
pub mod status_file;
pub mod supervisor;

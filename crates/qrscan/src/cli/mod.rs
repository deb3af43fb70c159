//! Command handlers.

pub mod config;
pub mod scan;
pub mod serve;

//! # Surveyor
//!
//! HTTP surface, configuration and CLI around `surveyor-core`.

pub mod api;
pub mod cli;
pub mod config;

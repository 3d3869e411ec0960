//! Teamsync
//!
//! Reconciles GitHub organization teams against declarative documents:
//! - Team identity (name, description, visibility)
//! - Team membership
//! - Repository access from ordered first-match patterns

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

//! Infrastructure layer - Document loading, remote clients and services

pub mod document;
pub mod github;
pub mod logging;
pub mod remote;
pub mod services;

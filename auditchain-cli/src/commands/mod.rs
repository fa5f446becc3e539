//! CLI commands module

pub mod config;
pub mod fetch;
pub mod login;
pub mod seal;
pub mod stats;
pub mod summary;
pub mod verify;

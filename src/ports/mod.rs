//! Port traits for external resources.

pub mod config_port;
pub mod data_port;

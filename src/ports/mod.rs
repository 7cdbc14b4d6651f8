//! Port traits for the external collaborators of the screener.

pub mod config_port;
pub mod data_port;
pub mod option_port;
pub mod result_sink;

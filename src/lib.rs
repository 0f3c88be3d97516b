// Library target for chorekit
// Exposes the modules to the binary and to integration tests

pub mod cleaner;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod geocode;
pub mod logging;
pub mod output;
pub mod recycle_bin;
pub mod speedtest;
pub mod targets;
pub mod utils;

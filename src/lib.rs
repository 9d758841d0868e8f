pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod manga;
pub mod notion;
pub mod table;

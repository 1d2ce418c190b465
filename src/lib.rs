#![forbid(unsafe_code)]

pub mod agent;
pub mod azure;
pub mod cli;
pub mod commands;
pub mod config;
pub mod definition;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod select;

pub mod config;
pub mod create;
pub mod delete;
pub mod discover;
pub mod helpers;
pub mod list;
pub mod pirate;

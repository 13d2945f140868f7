pub mod classify;
pub mod cli;
pub mod config;
pub mod document;
pub mod errors;
pub mod extract;
pub mod history;
pub mod log;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod sanitize;
pub mod server;
pub mod ux;
pub mod wire;

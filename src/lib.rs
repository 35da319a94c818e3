pub mod cli;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod models;

#[cfg(test)]
pub mod testing;

//! CLI module for stepgate - a thin pipeline driver over the library.

pub mod commands;

pub use commands::Cli;

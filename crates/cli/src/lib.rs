//! Public library modules for the CLI crate
pub mod clipboard;
pub mod output;

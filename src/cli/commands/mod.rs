//! CLI command implementations

pub mod generate;

pub use generate::execute as generate;

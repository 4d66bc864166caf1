//! nuget-offline - Offline NuGet sources for Flatpak builds
//!
//! Restores a .NET project into an isolated package folder for one or
//! more runtime identifiers and emits the flatpak-builder `file` sources
//! needed to repeat that restore without network access.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod restore;

pub use error::{NugetError, NugetResult};

//! Restorer factory
//!
//! Picks the restore backend from configuration.

use crate::config::Config;
use crate::restore::flatpak::FlatpakRestorer;
use crate::restore::host::HostRestorer;
use crate::restore::runtime::Restorer;

/// Create the restorer selected by `config.sandbox.enabled`
pub fn create_restorer(config: &Config) -> Box<dyn Restorer> {
    if config.sandbox.enabled {
        Box::new(FlatpakRestorer::new(config.sandbox.clone()))
    } else {
        Box::new(HostRestorer::new(config.restore.program.clone()))
    }
}

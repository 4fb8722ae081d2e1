//! CLI command implementations

pub mod admin;
pub mod collections;

use custos_store::RestStore;

use crate::config::{Config, ConfigPaths};
use crate::error::CliResult;

/// Build the REST store from the default configuration.
pub(crate) fn store_from_defaults() -> CliResult<RestStore> {
    let paths = ConfigPaths::new()?;
    let config = Config::load(&paths)?;
    RestStore::new(&config.endpoint, &config.api_key, config.timeout()).map_err(Into::into)
}

pub mod colors;
pub mod config;
pub mod highscore;
pub mod live;
pub mod simulate;

use stenocombo_core::{ComboConfig, ConfigError, Platform, TomlStore};

/// Open the settings file and load the config it holds.
pub fn load_settings() -> Result<(TomlStore, ComboConfig), ConfigError> {
    let store = TomlStore::open_default()?;
    let config = ComboConfig::load(&store, Platform::current());
    Ok((store, config))
}

/// Write `config` through `store` and flush it to disk.
pub fn save_settings(store: &mut TomlStore, config: &ComboConfig) -> Result<(), ConfigError> {
    config.save(store);
    store.flush()
}

mod combo_config;
mod fields;
mod store;

pub use combo_config::{ComboConfig, ConfigOverrides};
pub use fields::{
    Alignment, Field, FieldKind, FieldRange, FieldSpec, FieldValue, Platform, Section, FIELDS,
};
pub use store::{data_dir, MemoryStore, SettingsStore, TomlStore};

use std::path::PathBuf;

use lmdb::EnvironmentFlags;

use crate::codec::Codec;

/// Declarative configuration consumed once by [`Store::open`].
///
/// At least one entry in `databases` is required. Codecs are optional and
/// default to the standard binary format.
///
/// [`Store::open`]: crate::Store::open
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the environment files.
    pub path: PathBuf,
    /// Engine open flags.
    pub flags: EnvironmentFlags,
    /// Unix permission bits for files the engine creates.
    pub mode: u32,
    /// Maximum size of the memory map, and thus of the data file.
    pub map_size: usize,
    /// Maximum number of concurrent reader slots.
    pub max_readers: u32,
    /// Databases to open or create, by name.
    pub databases: Vec<DbConfig>,
    /// Environment-level codec, overriding the built-in default.
    pub codec: Option<Codec>,
}

impl Default for StoreConfig {
    fn default() -> StoreConfig {
        StoreConfig {
            path: PathBuf::from("."),
            flags: EnvironmentFlags::empty(),
            mode: 0o644,
            map_size: 1 << 30,
            max_readers: 1,
            databases: vec![DbConfig::new("default")],
            codec: None,
        }
    }
}

/// Configuration for a single named database inside the store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database name, unique within the store.
    pub name: String,
    /// Per-database codec, taking precedence over the environment-level one.
    pub codec: Option<Codec>,
}

impl DbConfig {
    /// Configuration for a database named `name` using inherited codecs.
    pub fn new(name: impl Into<String>) -> DbConfig {
        DbConfig {
            name: name.into(),
            codec: None,
        }
    }

    /// Override the codec for this database only.
    pub fn with_codec(mut self, codec: Codec) -> DbConfig {
        self.codec = Some(codec);
        self
    }
}

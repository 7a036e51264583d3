//! Guild prefix storage
//!
//! A sled-backed table mapping guild IDs to their chosen command prefix,
//! fronted by an in-memory cache. The cache is populated once at startup and
//! is the only thing the hot path (prefix resolution on every message)
//! touches; mutations write through to both.

use std::path::Path;

use dashmap::DashMap;
use firetail_common::{FiretailError, Result};
use tracing::{debug, info, warn};

const PREFIX_TREE: &str = "guild_prefixes";

/// Persistent guild → prefix table with an in-memory cache
pub struct PrefixStore {
    db: sled::Db,
    tree: sled::Tree,
    cache: DashMap<u64, String>,
}

impl PrefixStore {
    /// Open the store at the given path
    pub fn open<P: AsRef<Path>>(path: P, flush_interval_ms: u64) -> Result<Self> {
        info!("Opening prefix store at {:?}", path.as_ref());

        let config = sled::Config::default()
            .path(path.as_ref())
            .cache_capacity(8 * 1024 * 1024)
            .flush_every_ms(Some(flush_interval_ms));

        let db = config.open().map_err(|e| {
            FiretailError::database_with_source(
                format!("Failed to open database at {:?}", path.as_ref()),
                e,
            )
        })?;

        let tree = db
            .open_tree(PREFIX_TREE)
            .map_err(|e| FiretailError::database_with_source("Failed to open prefix tree", e))?;

        Ok(Self {
            db,
            tree,
            cache: DashMap::new(),
        })
    }

    /// Populate the cache from disk, returning how many prefixes were loaded
    ///
    /// Malformed entries are skipped with a warning; a single bad row must
    /// not keep the bot from starting.
    pub fn load(&self) -> Result<usize> {
        self.cache.clear();

        for entry in self.tree.iter() {
            let (key, value) = entry
                .map_err(|e| FiretailError::database_with_source("Failed to read prefix tree", e))?;

            let Ok(key_bytes) = <[u8; 8]>::try_from(key.as_ref()) else {
                warn!("Skipping prefix entry with invalid key length {}", key.len());
                continue;
            };
            let guild_id = u64::from_be_bytes(key_bytes);

            match std::str::from_utf8(&value) {
                Ok(prefix) => {
                    self.cache.insert(guild_id, prefix.to_string());
                }
                Err(_) => {
                    warn!("Skipping non-UTF-8 prefix for guild {}", guild_id);
                }
            }
        }

        debug!("Prefix cache loaded with {} entries", self.cache.len());
        Ok(self.cache.len())
    }

    /// The prefix a guild has chosen, if any
    ///
    /// Cache-only; callers fall back to the configured default on `None`.
    pub fn resolve(&self, guild_id: u64) -> Option<String> {
        self.cache.get(&guild_id).map(|entry| entry.value().clone())
    }

    /// Set a guild's prefix, updating disk and cache together
    pub async fn set(&self, guild_id: u64, prefix: &str) -> Result<()> {
        debug!("Setting prefix for guild {} to {:?}", guild_id, prefix);

        self.tree
            .insert(guild_id.to_be_bytes(), prefix.as_bytes())
            .map_err(|e| FiretailError::database_with_source("Failed to store prefix", e))?;

        self.tree
            .flush_async()
            .await
            .map_err(|e| FiretailError::database_with_source("Failed to flush prefix to disk", e))?;

        self.cache.insert(guild_id, prefix.to_string());
        Ok(())
    }

    /// Remove a guild's prefix, reverting it to the default
    ///
    /// Returns whether a prefix was actually stored.
    pub async fn clear(&self, guild_id: u64) -> Result<bool> {
        debug!("Clearing prefix for guild {}", guild_id);

        let existed = self
            .tree
            .remove(guild_id.to_be_bytes())
            .map_err(|e| FiretailError::database_with_source("Failed to remove prefix", e))?
            .is_some();

        if existed {
            self.tree.flush_async().await.map_err(|e| {
                FiretailError::database_with_source("Failed to flush prefix removal to disk", e)
            })?;
        }

        self.cache.remove(&guild_id);
        Ok(existed)
    }

    /// Number of guilds with a stored prefix
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether any guild has a stored prefix
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Size of the backing database on disk, for status reporting
    pub fn size_on_disk(&self) -> Result<u64> {
        self.db
            .size_on_disk()
            .map_err(|e| FiretailError::database_with_source("Failed to get database size", e))
    }
}

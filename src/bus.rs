//! Discovery and caching of kernel i2c adapters.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{PlatformError, Result};
use crate::paths::SysfsRoot;

/// Cache of discovered i2c buses, keyed by numeric bus id.
///
/// The kernel names adapter entries `i2c-<id>` and exposes the human bus
/// label in each entry's `name` file. Enumeration is lazy: the first
/// [`buses`](Self::buses) call populates the cache, later calls return the
/// cached view unless `force` is passed. Callers that change the bus
/// topology at runtime (e.g. by switching a mux) must force a refresh.
///
/// The cache is an explicit object owned by the bring-up context and shared
/// through [`crate::platform::Platform`], not process-global state.
pub struct I2cBusCache {
    adapters_root: PathBuf,
    buses: Mutex<BTreeMap<u32, String>>,
}

impl I2cBusCache {
    /// Cache over the adapter root of the given sysfs layout.
    pub fn new(root: &SysfsRoot) -> Self {
        Self {
            adapters_root: root.adapters_root().to_path_buf(),
            buses: Mutex::new(BTreeMap::new()),
        }
    }

    /// The bus-id to bus-name map, ascending by id.
    ///
    /// Rebuilds when `force` is set or the cache is empty; the rebuild
    /// clears the cache first, so a failed enumeration leaves nothing
    /// stale behind. An unreadable adapter root fails with
    /// [`PlatformError::BusEnumeration`]; a readable but empty one is a
    /// legitimate empty result.
    pub fn buses(&self, force: bool) -> Result<BTreeMap<u32, String>> {
        let mut cache = self.buses.lock();
        if !cache.is_empty() && !force {
            return Ok(cache.clone());
        }
        cache.clear();
        let enumeration_error = |source| PlatformError::BusEnumeration {
            path: self.adapters_root.clone(),
            source,
        };
        let entries = fs::read_dir(&self.adapters_root).map_err(enumeration_error)?;
        for entry in entries {
            let entry = entry.map_err(enumeration_error)?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let Some(id) = file_name
                .strip_prefix("i2c-")
                .and_then(|suffix| suffix.parse::<u32>().ok())
            else {
                continue;
            };
            let name = fs::read_to_string(entry.path().join("name")).map_err(enumeration_error)?;
            cache.insert(id, name.trim_end().to_string());
        }
        debug!("enumerated {} i2c buses", cache.len());
        Ok(cache.clone())
    }

    /// Drop the cached view; the next query re-enumerates.
    pub fn invalidate(&self) {
        self.buses.lock().clear();
    }

    /// Bus id of the `occurrence`-th (0-indexed) bus with the given name,
    /// scanning in ascending bus-id order.
    ///
    /// Multiple buses can share a logical name (multiplexed channels), so
    /// callers disambiguate by ordinal occurrence. Returns `None` when the
    /// occurrences are exhausted.
    pub fn bus_id_from_name(&self, name: &str, occurrence: usize, force: bool) -> Result<Option<u32>> {
        let buses = self.buses(force)?;
        let mut remaining = occurrence;
        for (id, bus_name) in &buses {
            if bus_name == name {
                if remaining == 0 {
                    return Ok(Some(*id));
                }
                remaining -= 1;
            }
        }
        Ok(None)
    }
}

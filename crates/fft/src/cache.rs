//! Size-keyed cache of shared FFT tables.
//!
//! Every cascade of a given grid size reads the same butterfly tables. The
//! cache hands out `Arc` clones so the tables outlive any single cascade and
//! are freed when the last holder (cache or cascade) drops them.

use std::collections::HashMap;
use std::sync::Arc;

use swell_core::OceanError;

use crate::tables::FftTables;

/// Owns one `Arc<FftTables>` per distinct transform size.
#[derive(Debug, Default)]
pub struct FftTableCache {
    tables: HashMap<usize, Arc<FftTables>>,
}

impl FftTableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tables for `size`, building them on first request.
    pub fn get_or_build(&mut self, size: usize) -> Result<Arc<FftTables>, OceanError> {
        if let Some(tables) = self.tables.get(&size) {
            log::trace!("FFT tables for size {size} served from cache");
            return Ok(Arc::clone(tables));
        }
        let tables = Arc::new(FftTables::precompute(size)?);
        self.tables.insert(size, Arc::clone(&tables));
        Ok(tables)
    }

    /// Drops cached tables for every size except `keep`.
    ///
    /// Cascades still holding an `Arc` keep their tables alive.
    pub fn retain_only(&mut self, keep: usize) {
        self.tables.retain(|&size, _| size == keep);
    }

    /// Number of distinct sizes currently cached.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

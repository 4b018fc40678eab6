//! Entity deduplication: raw rows to unique, ordered driver and carrier lists.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ordered::OrderedMap;
use crate::record::{Carrier, Driver, Keyed, RawRecord};

/// Deduplicated drivers and carriers, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    pub drivers: Vec<Driver>,
    pub carriers: Vec<Carrier>,
}

impl Directory {
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty() && self.carriers.is_empty()
    }

    pub fn driver(&self, id: &str) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.key() == id)
    }

    pub fn carrier(&self, id: &str) -> Option<&Carrier> {
        self.carriers.iter().find(|c| c.key() == id)
    }
}

/// Counters collected while deduplicating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    pub rows: usize,
    pub drivers_skipped: usize,
    pub carriers_skipped: usize,
    pub drivers_overwritten: usize,
    pub carriers_overwritten: usize,
}

/// Collapse rows into unique drivers and carriers.
///
/// Last write wins per id; position is that of the first occurrence. A row
/// missing the id or name for an entity type contributes nothing for that type
/// and is still considered for the other one.
pub fn deduplicate<'a, I>(rows: I) -> Directory
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    deduplicate_with_stats(rows).0
}

/// Like [`deduplicate`], also returning skip/overwrite counters.
pub fn deduplicate_with_stats<'a, I>(rows: I) -> (Directory, DedupStats)
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut drivers = OrderedMap::new();
    let mut carriers = OrderedMap::new();
    let mut stats = DedupStats::default();

    for row in rows {
        stats.rows += 1;

        match row.driver() {
            Some(driver) => {
                if drivers.upsert(driver).is_some() {
                    stats.drivers_overwritten += 1;
                }
            }
            None => stats.drivers_skipped += 1,
        }

        match row.carrier() {
            Some(carrier) => {
                if carriers.upsert(carrier).is_some() {
                    stats.carriers_overwritten += 1;
                }
            }
            None => stats.carriers_skipped += 1,
        }
    }

    debug!(
        rows = stats.rows,
        drivers = drivers.len(),
        carriers = carriers.len(),
        drivers_skipped = stats.drivers_skipped,
        carriers_skipped = stats.carriers_skipped,
        "deduplicated records"
    );

    let directory = Directory {
        drivers: drivers.into_vec(),
        carriers: carriers.into_vec(),
    };
    (directory, stats)
}

//! Append-only event log of valve-open transitions.

mod record;

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::classify::Classifier;
use crate::geometry::RegionGeometry;
use crate::store::Vessel;
use crate::time::{Clock, SystemClock};

pub use record::{DisposalStatus, HistoryRecord};

/// Append-only log of open events.
///
/// Records are kept in insertion order; reads return them sorted by
/// timestamp, newest first, with ties left in insertion order.
pub struct EventLog {
    records: RwLock<Vec<HistoryRecord>>,
    clock: Arc<dyn Clock>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Record that `vessel`'s valve just opened.
    ///
    /// Zone membership is evaluated now, against `buffer`, from the vessel's
    /// current position.
    pub fn record_open_event(
        &self,
        vessel: &Vessel,
        buffer: &RegionGeometry,
        classifier: &Classifier,
    ) -> HistoryRecord {
        let in_zone = classifier.in_zone(&vessel.position, buffer);
        let status = DisposalStatus::from_in_zone(in_zone);
        let record = HistoryRecord {
            vessel_id: vessel.id,
            vessel_name: vessel.name.clone(),
            timestamp: self.clock.now(),
            position: vessel.position,
            in_zone,
            status,
            region: vessel.region.clone(),
        };

        info!(
            boat_id = record.vessel_id,
            region = %record.region,
            in_zone,
            status = %status,
            "Valve opened"
        );

        self.records.write().push(record.clone());
        record
    }

    /// All records, newest first.
    pub fn history(&self) -> Vec<HistoryRecord> {
        let mut records = self.records.read().clone();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

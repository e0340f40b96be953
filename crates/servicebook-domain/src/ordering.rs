//! Record list ordering

use chrono::{DateTime, Utc};
use servicebook_types::VehicleRecord;

/// Sort records by creation timestamp, newest first.
///
/// Records without a timestamp sort as epoch, i.e. oldest, last. The sort is
/// stable, so equal timestamps keep their snapshot order. Applied to the
/// in-memory list on every snapshot; the order is never stored.
pub fn sort_newest_first(records: &mut [VehicleRecord]) {
    records.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));
}

fn sort_key(record: &VehicleRecord) -> DateTime<Utc> {
    record.timestamp.unwrap_or(DateTime::UNIX_EPOCH)
}

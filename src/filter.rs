use chrono::{DateTime, Utc};

use crate::models::StatementRecord;

/// Whether a record may be persisted in this cycle
///
/// Banks pre-book entries with future entry dates; those are not final and
/// are excluded here. The next run's overlapping fetch window picks them up
/// again once their entry date has passed, so exclusion needs no local
/// retry bookkeeping. Expects the entry-date correction to have run first.
pub fn is_eligible(record: &StatementRecord, now: DateTime<Utc>) -> bool {
    record.entry_date <= now.date_naive()
}

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

/// Overlap subtracted from the last withdrawal timestamp so entries booked
/// around the previous run's cut-off are fetched again
const OVERLAP_DAYS: i64 = 1;

/// Half-open `[start, end)` range requested from the upstream source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FetchWindow {
    /// Start bound at day granularity, for sources indexed by posting date
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// End bound at day granularity
    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    /// Whether a posting date falls inside the window
    ///
    /// Day granularity: the end bound is `now`, so every entry posted on the
    /// end day was posted before it and belongs to this window.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }
}

/// Lower bound for accounts that have never been synced; predates any
/// statement the upstream sources can return
pub fn epoch_floor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
        .single()
        .expect("fixed epoch floor is a valid timestamp")
}

/// Compute the fetch window for one account
///
/// A never-synced account starts at the epoch floor; otherwise the window
/// starts one day before the last recorded withdrawal. Re-fetched entries
/// from the overlap are rejected by the sinks' uniqueness keys, so the
/// overlap trades duplicate inserts (benign) for never losing a late entry.
pub fn fetch_window(last_withdrawn_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> FetchWindow {
    let start = match last_withdrawn_at {
        Some(last) => last - Duration::days(OVERLAP_DAYS),
        None => epoch_floor(),
    };

    FetchWindow { start, end: now }
}

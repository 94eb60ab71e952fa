use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// key: listing-window -> optional calendar bounds on a property listing
/// A missing start means the listing has always been live; a missing end
/// means it never expires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ListingWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        is_listing_active(self.start, self.end, now)
    }
}

/// key: listing-activity -> inclusive, day-granular containment check
/// Only marketplace visibility depends on this. Quota counting ignores the
/// window entirely, so expired listings still count against a plan.
pub fn is_listing_active(
    listing_start: Option<NaiveDate>,
    listing_end: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> bool {
    let today = now.date_naive();
    let started = listing_start.map_or(true, |start| start <= today);
    let not_ended = listing_end.map_or(true, |end| today <= end);
    started && not_ended
}

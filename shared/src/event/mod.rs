pub mod handle;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

/// Represents an event created by a professor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Event {
    pub id: u64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "data_inicio")]
    pub start_date: NaiveDate,
    #[serde(rename = "data_fim", default)]
    pub end_date: Option<NaiveDate>,
    /// Free-form time of day, e.g. `"08:00"`.
    #[serde(rename = "horario", default)]
    pub time: Option<String>,
    #[serde(rename = "local_evento", default)]
    pub location: Option<String>,
    /// The unguessable token public participants reach this event with.
    /// Never changes once issued.
    #[serde(rename = "link_unico", default)]
    pub public_link: String,
    #[serde(default)]
    pub campus_id: Option<u64>,
    #[serde(rename = "autorizacoes_count", default)]
    pub authorization_count: u64,
}

impl Event {
    /// Every calendar day this event spans.
    pub fn dates(&self) -> DateSpan {
        expand_dates(self.start_date, self.end_date)
    }

    /// Whether this event spans more than its start day.
    pub fn is_multi_day(&self) -> bool {
        self.end_date.map_or(false, |end| end != self.start_date)
    }
}

/// Anchors `date` at midday, so local midnight rounding never moves it.
fn at_anchor(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default()) + Duration::hours(12)
}

/// Expands an event's date range into its calendar days, `end` included.
///
/// A missing `end` yields the start day only. An `end` before `start` is an
/// input error and yields an empty span.
pub fn expand_dates(start: NaiveDate, end: Option<NaiveDate>) -> DateSpan {
    let end = end.unwrap_or(start);
    let end = at_anchor(end);
    let next = at_anchor(start);

    DateSpan {
        next: (next <= end).then_some(next),
        end,
    }
}

/// An ordered, finite sequence of days produced by [`expand_dates`].
///
/// The sequence is consumed as it is iterated and cannot be restarted.
#[derive(Debug)]
pub struct DateSpan {
    next: Option<NaiveDateTime>,
    end: NaiveDateTime,
}

impl Iterator for DateSpan {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current
            .checked_add_signed(Duration::days(1))
            .filter(|next| *next <= self.end);
        Some(current.date())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for DateSpan {
    fn len(&self) -> usize {
        self.next
            .map_or(0, |next| (self.end - next).num_days() as usize + 1)
    }
}

impl FusedIterator for DateSpan {}

/// Picks the day the attendance screen opens on: `today` if the event spans
/// it, the first day otherwise.
pub fn default_selected_date(dates: &[NaiveDate], today: NaiveDate) -> Option<NaiveDate> {
    if dates.contains(&today) {
        Some(today)
    } else {
        dates.first().copied()
    }
}

/// Today's date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

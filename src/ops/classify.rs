use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDate, TimeZone, Weekday};
use serde::{Deserialize, Serialize};

use crate::model::band::RecencyBand;
use crate::model::entry::PathEntry;

/// First day of the calendar week
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    fn weekday(self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }

    /// The first day of the week containing `date`.
    pub fn week_of(self, date: NaiveDate) -> NaiveDate {
        let offset = (date.weekday().num_days_from_monday() + 7
            - self.weekday().num_days_from_monday())
            % 7;
        date - Days::new(u64::from(offset))
    }
}

/// Band for `entry` using the local calendar and Monday-start weeks.
pub fn classify(entry: &PathEntry, now: DateTime<Local>) -> RecencyBand {
    classify_at(entry, &now, WeekStart::default())
}

/// Band for `entry` relative to `now`, evaluated in `now`'s time zone.
///
/// Boundaries are calendar days, weeks and months, not elapsed time: an
/// access at 23:00 is `Yesterday` at 01:00 the next morning.
pub fn classify_at<Tz: TimeZone>(
    entry: &PathEntry,
    now: &DateTime<Tz>,
    week_start: WeekStart,
) -> RecencyBand {
    if entry.is_pinned() {
        return RecencyBand::Pinned;
    }
    let today = now.date_naive();
    let day = entry.last_access().with_timezone(&now.timezone()).date_naive();
    band_for_date(day, today, week_start)
}

/// Band for an access on `day` when the current date is `today`.
pub fn band_for_date(day: NaiveDate, today: NaiveDate, week_start: WeekStart) -> RecencyBand {
    if day >= today {
        return RecencyBand::Today;
    }
    if today.pred_opt() == Some(day) {
        return RecencyBand::Yesterday;
    }

    let this_week = week_start.week_of(today);
    if day >= this_week {
        return RecencyBand::ThisWeek;
    }
    if day >= this_week - Days::new(7) {
        return RecencyBand::LastWeek;
    }

    let this_month = today.with_day(1).unwrap_or(today);
    if day >= this_month {
        return RecencyBand::ThisMonth;
    }
    match this_month.checked_sub_months(Months::new(1)) {
        Some(last_month) if day >= last_month => RecencyBand::LastMonth,
        _ => RecencyBand::Older,
    }
}

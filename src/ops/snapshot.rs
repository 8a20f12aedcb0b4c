use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::model::band::RecencyBand;
use crate::model::entry::PathEntry;
use crate::ops::classify::{WeekStart, classify_at};

/// One display group of a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct RecencyGroup {
    pub band: RecencyBand,
    pub entries: Vec<PathEntry>,
}

/// Group entries by band, in band precedence order.
///
/// `entries` must be in manual order: the pinned group keeps it, every other
/// group is sorted most recent first (ties keep manual order). Empty bands
/// are left out.
pub fn group_entries<'a, Tz: TimeZone>(
    entries: impl IntoIterator<Item = &'a PathEntry>,
    now: &DateTime<Tz>,
    week_start: WeekStart,
) -> Vec<RecencyGroup> {
    let mut buckets: BTreeMap<RecencyBand, Vec<PathEntry>> = BTreeMap::new();
    for entry in entries {
        let band = classify_at(entry, now, week_start);
        buckets.entry(band).or_default().push(entry.clone());
    }

    buckets
        .into_iter()
        .map(|(band, mut entries)| {
            if band != RecencyBand::Pinned {
                entries.sort_by(|a, b| b.last_access().cmp(&a.last_access()));
            }
            RecencyGroup { band, entries }
        })
        .collect()
}

/// Flatten groups back into display order.
pub fn flatten(groups: &[RecencyGroup]) -> Vec<&PathEntry> {
    groups.iter().flat_map(|g| g.entries.iter()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::list::MruList;
    use chrono::{Duration, Utc};

    fn now() -> DateTime<Utc> {
        // Thursday
        Utc.with_ymd_and_hms(2025, 6, 12, 15, 0, 0).unwrap()
    }

    #[test]
    fn groups_come_out_in_band_order() {
        let mut list = MruList::new();
        list.upsert("/old.txt", None, now() - Duration::days(90));
        list.upsert("/today.txt", None, now() - Duration::hours(1));
        list.upsert("/yday.txt", None, now() - Duration::days(1));
        list.upsert("/pin.txt", Some(true), now() - Duration::days(200));

        let groups = list.snapshot_at(&now(), WeekStart::Monday);
        let bands: Vec<RecencyBand> = groups.iter().map(|g| g.band).collect();
        assert_eq!(
            bands,
            vec![
                RecencyBand::Pinned,
                RecencyBand::Today,
                RecencyBand::Yesterday,
                RecencyBand::Older,
            ]
        );
    }

    #[test]
    fn groups_sort_most_recent_first() {
        let mut list = MruList::new();
        list.upsert("/a.txt", None, now() - Duration::hours(3));
        list.upsert("/b.txt", None, now() - Duration::hours(1));
        list.upsert("/c.txt", None, now() - Duration::hours(2));
        // Refreshing /a.txt makes it the newest
        list.upsert("/a.txt", None, now() - Duration::minutes(5));

        let groups = list.snapshot_at(&now(), WeekStart::Monday);
        let order: Vec<&str> = flatten(&groups).iter().map(|e| e.path()).collect();
        assert_eq!(order, vec!["/a.txt", "/b.txt", "/c.txt"]);
    }

    #[test]
    fn pinned_group_keeps_manual_order() {
        let mut list = MruList::new();
        list.upsert("/p1.txt", Some(true), now() - Duration::days(3));
        list.upsert("/p2.txt", Some(true), now());
        // Manual order: /p2.txt, /p1.txt; swap it
        list.move_entry("/p1.txt", crate::model::list::Direction::Up);

        let groups = list.snapshot_at(&now(), WeekStart::Monday);
        let pinned: Vec<&str> = groups[0].entries.iter().map(|e| e.path()).collect();
        assert_eq!(pinned, vec!["/p1.txt", "/p2.txt"]);
    }

    #[test]
    fn pinning_moves_entry_to_front_of_snapshot() {
        let mut list = MruList::new();
        list.upsert("/fresh.txt", None, now());
        list.upsert("/stale.txt", None, now() - Duration::days(365));
        assert!(list.set_pinned("/stale.txt", true));

        let groups = list.snapshot_at(&now(), WeekStart::Monday);
        assert_eq!(flatten(&groups)[0].path(), "/stale.txt");
        assert_eq!(groups[0].band, RecencyBand::Pinned);
    }

    #[test]
    fn empty_list_has_no_groups() {
        let list = MruList::new();
        assert!(list.snapshot_at(&now(), WeekStart::Monday).is_empty());
    }
}

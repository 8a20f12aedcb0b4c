use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::model::config::MruConfig;
use crate::model::entry::PathEntry;
use crate::ops::snapshot::RecencyGroup;
use crate::util::time::relative_time;
use crate::util::unicode::{pad_to_width, truncate_middle};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct EntryJson {
    pub path: String,
    pub pinned: bool,
    pub last_access: String,
}

#[derive(Serialize)]
pub struct GroupJson {
    pub band: crate::model::band::RecencyBand,
    pub label: &'static str,
    pub entries: Vec<EntryJson>,
}

#[derive(Serialize)]
pub struct ListJson {
    pub groups: Vec<GroupJson>,
}

#[derive(Serialize)]
pub struct ConfigJson {
    pub store: String,
    pub max_size: usize,
    pub week_start: crate::ops::classify::WeekStart,
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

pub fn entry_to_json(entry: &PathEntry) -> EntryJson {
    EntryJson {
        path: entry.path().to_string(),
        pinned: entry.is_pinned(),
        last_access: entry
            .last_access()
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

pub fn groups_to_json(groups: &[RecencyGroup]) -> ListJson {
    ListJson {
        groups: groups
            .iter()
            .map(|g| GroupJson {
                band: g.band,
                label: g.band.label(),
                entries: g.entries.iter().map(entry_to_json).collect(),
            })
            .collect(),
    }
}

pub fn config_to_json(config: &MruConfig, store: &str) -> ConfigJson {
    ConfigJson {
        store: store.to_string(),
        max_size: config.list.max_size,
        week_start: config.list.week_start,
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Cells reserved for the relative-time column
const WHEN_WIDTH: usize = 12;
/// Leading indent plus pin marker
const GUTTER_WIDTH: usize = 4;

/// Terminal width from `COLUMNS`, default 80.
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .filter(|&w: &usize| w >= 24)
        .unwrap_or(80)
}

/// Render groups as headed sections:
///
/// ```text
/// Pinned
///   * /srv/notes.md            3 days ago
///
/// Today
///     /home/ann/a.txt          2 hr ago
/// ```
pub fn format_groups(groups: &[RecencyGroup], now: &DateTime<Utc>, width: usize) -> String {
    let path_width = width.saturating_sub(GUTTER_WIDTH + 2 + WHEN_WIDTH).max(8);
    let mut sections = Vec::new();
    for group in groups {
        let mut lines = vec![group.band.label().to_string()];
        for entry in &group.entries {
            let marker = if entry.is_pinned() { "* " } else { "  " };
            let path = pad_to_width(&truncate_middle(entry.path(), path_width), path_width);
            lines.push(format!(
                "  {}{}  {}",
                marker,
                path,
                relative_time(&entry.last_access(), now)
            ));
        }
        sections.push(lines.join("\n"));
    }
    sections.join("\n\n")
}

use regex::Regex;

use crate::model::band::RecencyBand;
use crate::ops::snapshot::RecencyGroup;

/// Narrowing applied to a snapshot before display
#[derive(Debug, Clone, Default)]
pub struct SnapshotFilter {
    pub pattern: Option<Regex>,
    pub band: Option<RecencyBand>,
    /// Maximum number of entries across all groups
    pub limit: Option<usize>,
}

impl SnapshotFilter {
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none() && self.band.is_none() && self.limit.is_none()
    }

    /// Apply the filter, dropping groups left empty.
    pub fn apply(&self, groups: Vec<RecencyGroup>) -> Vec<RecencyGroup> {
        let mut remaining = self.limit.unwrap_or(usize::MAX);
        let mut out = Vec::new();

        for mut group in groups {
            if remaining == 0 {
                break;
            }
            if let Some(band) = self.band {
                if group.band != band {
                    continue;
                }
            }
            if let Some(re) = &self.pattern {
                group.entries.retain(|e| re.is_match(e.path()));
            }
            group.entries.truncate(remaining);
            if group.entries.is_empty() {
                continue;
            }
            remaining -= group.entries.len();
            out.push(group);
        }
        out
    }
}

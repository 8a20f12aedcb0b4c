use serde::{Deserialize, Serialize};

use crate::ops::classify::WeekStart;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MruConfig {
    #[serde(default)]
    pub list: ListConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Maximum number of unpinned entries kept. Pinned entries are extra.
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// First day of the week for the "This week"/"Last week" bands
    #[serde(default)]
    pub week_start: WeekStart,
}

impl Default for ListConfig {
    fn default() -> Self {
        ListConfig {
            max_size: DEFAULT_MAX_SIZE,
            week_start: WeekStart::default(),
        }
    }
}

pub const DEFAULT_MAX_SIZE: usize = 20;

fn default_max_size() -> usize {
    DEFAULT_MAX_SIZE
}

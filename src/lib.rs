//! Most-recently-used file list.
//!
//! Tracks recently accessed paths keyed by their normalized form, keeps
//! pinned entries on top, evicts the oldest unpinned entries past a size
//! limit, and groups entries into calendar recency bands for display.
//!
//! ```
//! use chrono::Utc;
//! use mru::{MruConfig, MruListService};
//!
//! let service = MruListService::new(MruConfig::default());
//! assert!(service.update_entry("/home/ann/notes.md", None));
//! assert!(service.update_entry("/home/ann/./notes.md", Some(true)));
//! assert_eq!(service.len(), 1);
//!
//! let groups = service.grouped_snapshot(&Utc::now());
//! assert_eq!(groups[0].band, mru::RecencyBand::Pinned);
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod ops;
pub mod service;
pub mod util;

pub use error::{PathError, StoreError};
pub use model::{Direction, MruConfig, MruList, PathEntry, PathKey, RecencyBand, UpsertOutcome, normalize};
pub use ops::classify::{WeekStart, classify, classify_at};
pub use ops::snapshot::RecencyGroup;
pub use service::{MruEvent, MruListService};

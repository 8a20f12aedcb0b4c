pub mod band;
pub mod config;
pub mod entry;
pub mod list;
pub mod path;

pub use band::*;
pub use config::*;
pub use entry::*;
pub use list::*;
pub use path::*;

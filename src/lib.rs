//! Monthly habit grid with sleep/study chart scaffolds.
//!
//! The month state is loaded from a key-value store, normalized into a
//! fixed 12 x 31 shape, rendered as a grid plus two charts, and written back
//! after every edit.

pub mod app;
pub mod calendar;
pub mod chart;
pub mod codec;
pub mod config;
pub mod export;
pub mod grid;
pub mod logging;
pub mod session;
pub mod state;
pub mod store;
pub mod ui;

pub use calendar::{MonthKey, days_in_month, month_label};
pub use chart::{ChartLayout, ChartScene, render_line_template};
pub use codec::{CodecError, storage_key};
pub use grid::{GridEvent, GridPatch, GridView};
pub use session::{ChartTarget, Session};
pub use state::{HABIT_COUNT, MAX_DAYS, MonthState, PersistedRecord, normalize};
pub use store::{FileStore, KvStore, MemoryStore};

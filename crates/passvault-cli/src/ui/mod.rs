//! UI primitives for the Passvault CLI.
//!
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badges and colors
//! - **Render**: Tables, key-value lines, receipts, hints
//! - **Progress**: Spinner shown while the key is derived
//! - **Format**: String utilities (truncate, short ids, masking)

mod context;
pub mod format;
pub mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use theme::Badge;

pub use render::{badge, hint, kv, receipt, table, Column};

pub use progress::Spinner;

pub use format::{format_datetime, mask, short_id, truncate};

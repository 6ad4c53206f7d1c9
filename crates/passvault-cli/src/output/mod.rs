//! Record output in JSON, plain and pretty formats.
//!
//! Masked field values are replaced with `********` unless the caller
//! explicitly asks to reveal them.

mod json;
mod text;

pub use json::{record_json, records_json};
pub use text::{print_record, print_record_list};

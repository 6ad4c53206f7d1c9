//! Input and parsing helper functions for the CLI.
//!
//! - Passphrase prompting and confirmations (`input`)
//! - `--field` specs (`fields`)
//! - Record IDs and kinds (`parsing`)

mod fields;
pub mod input;
mod parsing;

pub use fields::{parse_field_spec, parse_field_specs};
pub use input::{confirm, prompt_new_passphrase, prompt_passphrase};
pub use parsing::{parse_kind, resolve_record_id};

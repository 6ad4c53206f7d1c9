//! Parsing helpers for record kinds and IDs.

use std::str::FromStr;

use passvault_core::{Record, RecordKind};
use uuid::Uuid;

use crate::errors::CliError;

pub fn parse_kind(value: &str) -> anyhow::Result<RecordKind> {
    RecordKind::from_str(value).map_err(|_| {
        let known: Vec<&str> = RecordKind::ALL.iter().map(|k| k.as_str()).collect();
        anyhow::anyhow!(
            "Unknown record kind \"{}\" (expected one of: {})",
            value,
            known.join(", ")
        )
    })
}

/// Resolve a full UUID or a unique ID prefix to a record ID.
pub fn resolve_record_id(records: &[Record], input: &str) -> anyhow::Result<Uuid> {
    let input = input.trim();
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(id);
    }
    if input.is_empty() {
        return Err(anyhow::anyhow!("Record ID cannot be empty"));
    }

    let prefix = input.to_ascii_lowercase();
    let mut matches = records
        .iter()
        .map(Record::id)
        .filter(|id| id.to_string().starts_with(&prefix));

    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (Some(_), Some(_)) => Err(anyhow::anyhow!(
            "Record ID prefix \"{}\" is ambiguous; use more characters",
            input
        )),
        (None, _) => Err(CliError::not_found(
            format!("Record not found: {}", input),
            "Hint: Run `passvault list` to find record IDs.",
        )
        .into()),
    }
}

//! JSON output formatting for records.

use passvault_core::Record;

use crate::ui::mask;

/// Convert a record to JSON for output.
pub fn record_json(record: &Record, reveal: bool) -> serde_json::Value {
    let fields: Vec<serde_json::Value> = record
        .fields()
        .iter()
        .map(|field| {
            serde_json::json!({
                "name": field.name,
                "kind": field.kind.as_str(),
                "value": mask(&field.value, field.kind.is_masked() && !reveal),
            })
        })
        .collect();

    serde_json::json!({
        "id": record.id(),
        "kind": record.kind().as_str(),
        "name": record.name(),
        "favorite": record.is_favorite(),
        "note": record.note(),
        "fields": fields,
        "created_at": record.created_at(),
        "modified_at": record.modified_at(),
    })
}

/// Convert multiple records to a JSON array; values stay masked.
pub fn records_json<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<serde_json::Value> {
    records
        .into_iter()
        .map(|record| record_json(record, false))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use passvault_core::{Field, NewRecord, RecordKind};

    fn credential() -> Record {
        Record::create(
            NewRecord::new(RecordKind::Credential, "Mail")
                .with_field(Field::text("login", "alice"))
                .with_field(Field::hidden("password", "sesame")),
        )
        .unwrap()
    }

    #[test]
    fn test_hidden_values_masked_by_default() {
        let json = record_json(&credential(), false).to_string();
        assert!(json.contains("alice"));
        assert!(!json.contains("sesame"));
        assert!(json.contains("********"));
    }

    #[test]
    fn test_reveal_shows_values() {
        let json = record_json(&credential(), true).to_string();
        assert!(json.contains("sesame"));
    }

    #[test]
    fn test_records_json_never_reveals() {
        let records = vec![credential()];
        let json = serde_json::Value::Array(records_json(&records)).to_string();
        assert!(!json.contains("sesame"));
    }
}

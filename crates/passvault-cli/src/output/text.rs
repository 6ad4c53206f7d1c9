//! Text and table output formatting for records.

use passvault_core::Record;

use crate::ui::{format_datetime, kv, mask, short_id, table, truncate, Column, UiContext};

const NAME_WIDTH: usize = 40;

/// Print a single record in human-readable format.
pub fn print_record(ui: &UiContext, record: &Record, reveal: bool) {
    let pretty = ui.mode.is_pretty();
    if !ui.quiet {
        println!("{}", kv(ui, "ID", &record.id().to_string()));
        println!("{}", kv(ui, "Kind", record.kind().as_str()));
        println!("{}", kv(ui, "Name", record.name()));
        if record.is_favorite() {
            println!("{}", kv(ui, "Favorite", "yes"));
        }
        println!(
            "{}",
            kv(ui, "Modified", &format_datetime(&record.modified_at(), pretty))
        );
        println!();
    }

    for field in record.fields() {
        let value = mask(&field.value, field.kind.is_masked() && !reveal);
        println!("{}", kv(ui, &field.name, value));
    }
    if !record.note().is_empty() {
        if !record.fields().is_empty() {
            println!();
        }
        println!("{}", record.note());
    }
}

/// Print records as a table, or one tab-separated line per record.
pub fn print_record_list<'a>(ui: &UiContext, records: impl IntoIterator<Item = &'a Record>) {
    let columns = [
        Column::new("ID"),
        Column::new("Kind"),
        Column::new("Name"),
        Column::new("Fav"),
        Column::new("Modified"),
    ];
    let pretty = ui.mode.is_pretty();
    let rows: Vec<Vec<String>> = records
        .into_iter()
        .map(|record| {
            vec![
                if pretty {
                    short_id(&record.id())
                } else {
                    record.id().to_string()
                },
                record.kind().as_str().to_string(),
                truncate(record.name(), NAME_WIDTH),
                if record.is_favorite() { "*" } else { "" }.to_string(),
                format_datetime(&record.modified_at(), pretty),
            ]
        })
        .collect();

    if rows.is_empty() {
        if !ui.quiet {
            eprintln!("No records found.");
        }
        return;
    }
    println!("{}", table(ui, &columns, &rows));
}

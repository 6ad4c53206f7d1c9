use passvault_core::RecordKind;

use crate::app::AppContext;
use crate::ui::{table, Column};

pub fn handle_kinds(ctx: &AppContext) -> anyhow::Result<()> {
    let ui = ctx.ui(false);
    let rows: Vec<Vec<String>> = RecordKind::ALL
        .iter()
        .map(|kind| {
            let fields: Vec<String> = kind
                .default_fields()
                .iter()
                .map(|f| format!("{}:{}", f.name, f.kind.as_str()))
                .collect();
            let fields = if kind.has_fields() {
                fields.join(", ")
            } else {
                "(note only)".to_string()
            };
            vec![kind.as_str().to_string(), fields]
        })
        .collect();

    println!(
        "{}",
        table(&ui, &[Column::new("Kind"), Column::new("Default fields")], &rows)
    );
    Ok(())
}

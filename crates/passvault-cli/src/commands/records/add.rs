use passvault_core::{NewRecord, Record};

use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::helpers::{parse_field_specs, parse_kind};
use crate::ui::{hint, receipt, short_id};

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    // Validate arguments before asking for the passphrase.
    let kind = parse_kind(&args.kind)?;
    let fields = parse_field_specs(&args.field, kind)?;

    let mut new_record = NewRecord::new(kind, args.name.clone()).favorite(args.favorite);
    for field in fields {
        new_record = new_record.with_field(field);
    }
    if let Some(note) = &args.note {
        new_record = new_record.with_note(note.clone());
    }
    let record = Record::create(new_record)?;

    let ui = ctx.ui(false);
    let mut session = ctx.unlock(&ui)?;
    let id = session.add_record(record)?;
    session.save()?;
    session.lock();

    if !ctx.quiet() {
        let full_id = id.to_string();
        println!(
            "{}",
            receipt(&ui, "Added record", &[("ID", full_id.as_str()), ("Kind", kind.as_str())])
        );
        println!("{}", hint(&ui, &format!("passvault show {}", short_id(&id))));
    }
    Ok(())
}

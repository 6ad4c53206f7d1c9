use passvault_core::RecordUpdate;

use crate::app::AppContext;
use crate::cli::EditArgs;
use crate::helpers::{parse_field_spec, resolve_record_id};
use crate::ui::receipt;

pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let specs = args
        .field
        .iter()
        .map(|raw| parse_field_spec(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let ui = ctx.ui(false);
    let mut session = ctx.unlock(&ui)?;
    let id = resolve_record_id(session.records()?, &args.id)?;
    let kind = session
        .get_record(&id)?
        .map(|record| record.kind())
        .ok_or(passvault_core::VaultError::RecordNotFound(id))?;

    let mut update = RecordUpdate::new();
    if let Some(name) = &args.name {
        update = update.name(name.clone());
    }
    if let Some(note) = &args.note {
        update = update.note(note.clone());
    }
    if let Some(favorite) = args.favorite {
        update = update.favorite(favorite);
    }
    for spec in specs {
        update = update.set_field(spec.into_field(kind));
    }
    for name in &args.remove_field {
        update = update.remove_field(name.clone());
    }
    if update.is_empty() {
        return Err(anyhow::anyhow!(
            "Nothing to change. Use --name, --note, --field, --remove-field or --favorite."
        ));
    }

    session.update_record(&id, &update)?;
    session.save()?;
    session.lock();

    if !ctx.quiet() {
        let full_id = id.to_string();
        println!("{}", receipt(&ui, "Updated record", &[("ID", full_id.as_str())]));
    }
    Ok(())
}

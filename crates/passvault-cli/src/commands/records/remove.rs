use crate::app::AppContext;
use crate::cli::RemoveArgs;
use crate::helpers::{confirm, resolve_record_id};
use crate::ui::receipt;

pub fn handle_remove(ctx: &AppContext, args: &RemoveArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(false);
    let mut session = ctx.unlock(&ui)?;
    let id = resolve_record_id(session.records()?, &args.id)?;

    if !args.yes {
        let name = session
            .get_record(&id)?
            .map(|record| record.name().to_string())
            .unwrap_or_default();
        if !confirm(&format!("Remove \"{}\"?", name))? {
            return Err(anyhow::anyhow!(
                "Not removed. Pass --yes to skip the confirmation."
            ));
        }
    }

    let removed = session.remove_record(&id)?;
    session.save()?;
    session.lock();

    if !ctx.quiet() {
        let full_id = removed.id().to_string();
        println!(
            "{}",
            receipt(&ui, "Removed record", &[("ID", full_id.as_str()), ("Name", removed.name())])
        );
    }
    Ok(())
}

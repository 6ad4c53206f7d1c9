use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::errors::CliError;
use crate::helpers::resolve_record_id;
use crate::output::{print_record, record_json};

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json);
    let mut session = ctx.unlock(&ui)?;
    {
        let id = resolve_record_id(session.records()?, &args.id)?;
        let record = session.get_record(&id)?.ok_or_else(|| {
            CliError::not_found(
                format!("Record not found: {}", id),
                "Hint: Run `passvault list` to find record IDs.",
            )
        })?;

        if ui.mode.is_json() {
            let output = serde_json::to_string_pretty(&record_json(record, args.reveal))?;
            println!("{}", output);
        } else {
            print_record(&ui, record, args.reveal);
        }
    }
    session.lock();
    Ok(())
}

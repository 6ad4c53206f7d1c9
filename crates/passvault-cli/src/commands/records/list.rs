use passvault_core::RecordFilter;

use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::helpers::parse_kind;
use crate::output::{print_record_list, records_json};

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let mut filter = RecordFilter::new();
    if let Some(kind) = &args.kind {
        filter = filter.kind(parse_kind(kind)?);
    }
    if args.favorite {
        filter = filter.favorite(true);
    }
    if let Some(text) = &args.search {
        filter = filter.text(text.clone());
    }

    let ui = ctx.ui(args.json);
    let mut session = ctx.unlock(&ui)?;
    {
        let matches = session.filter(filter)?;
        if ui.mode.is_json() {
            let output = serde_json::to_string_pretty(&records_json(&matches))?;
            println!("{}", output);
        } else {
            print_record_list(&ui, &matches);
        }
    }
    session.lock();
    Ok(())
}

//! Passvault CLI - A local, encrypted, single-file password manager
//!
//! This is the command-line interface for Passvault. It drives the core
//! library: every command unlocks the vault, does its work, saves if
//! anything changed and locks again before exiting.

mod app;
mod cli;
mod commands;
mod config;
mod errors;
mod helpers;
mod output;
mod ui;

use clap::Parser;

use passvault_core::{init_logging, LogLevel};

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::errors::classify;
use crate::ui::{badge, Badge, UiContext};

fn main() {
    let cli = Cli::parse();
    let ui = UiContext::from_env(false, cli.no_color, cli.quiet);

    if let Some(dir) = cli.log_dir.as_deref() {
        let dir = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
        if let Err(err) = init_logging(LogLevel::default_for_build(), &dir) {
            let message = format!("Logging disabled: {}", err);
            eprintln!("{}", badge(&ui, Badge::Warn, &message));
        }
    }

    let ctx = AppContext::new(&cli);
    if let Err(err) = run(&ctx) {
        log::error!("event=cli_command module=cli status=error");
        classify(&err).exit(&ui);
    }
}

fn run(ctx: &AppContext) -> anyhow::Result<()> {
    match &ctx.cli().command {
        Commands::Init(args) => commands::handle_init(ctx, args),
        Commands::Add(args) => commands::handle_add(ctx, args),
        Commands::List(args) => commands::handle_list(ctx, args),
        Commands::Show(args) => commands::handle_show(ctx, args),
        Commands::Edit(args) => commands::handle_edit(ctx, args),
        Commands::Remove(args) => commands::handle_remove(ctx, args),
        Commands::Passwd => commands::handle_passwd(ctx),
        Commands::Kinds => commands::handle_kinds(ctx),
    }
}

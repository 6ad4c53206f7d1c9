use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use passvault_core::VERSION;

/// Passvault - A local, encrypted, single-file password manager
#[derive(Parser)]
#[command(name = "passvault")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the vault file
    #[arg(short, long, global = true, env = "PASSVAULT_PATH")]
    pub vault: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Write diagnostic logs to this directory
    #[arg(long, global = true, env = "PASSVAULT_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the vault will be created
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Argon2 iterations for the new vault
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Do not write a config file; the vault keeps the configured KDF cost
    #[arg(long)]
    pub no_config: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Record kind (note, credential, card, identity)
    #[arg(value_name = "KIND")]
    pub kind: String,

    /// Display name of the record
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Field value as name=value or name:kind=value (repeatable)
    #[arg(short, long, value_name = "FIELD")]
    pub field: Vec<String>,

    /// Free-form note
    #[arg(long)]
    pub note: Option<String>,

    /// Mark the record as a favorite
    #[arg(long)]
    pub favorite: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Filter by record kind
    #[arg(long)]
    pub kind: Option<String>,

    /// Only favorites
    #[arg(long)]
    pub favorite: bool,

    /// Case-insensitive text search over names, notes and visible fields
    #[arg(short, long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Record ID (full UUID or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Print hidden values in clear text
    #[arg(long)]
    pub reveal: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Record ID (full UUID or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// New display name
    #[arg(long)]
    pub name: Option<String>,

    /// Replace the note
    #[arg(long)]
    pub note: Option<String>,

    /// Set a field as name=value or name:kind=value (repeatable)
    #[arg(short, long, value_name = "FIELD")]
    pub field: Vec<String>,

    /// Remove a field by name (repeatable)
    #[arg(long, value_name = "NAME")]
    pub remove_field: Vec<String>,

    /// Set or clear the favorite flag
    #[arg(long, value_name = "BOOL")]
    pub favorite: Option<bool>,
}

/// Arguments for the `remove` command
#[derive(Args)]
pub struct RemoveArgs {
    /// Record ID (full UUID or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new encrypted vault
    Init(InitArgs),

    /// Add a record to the vault
    Add(AddArgs),

    /// List records
    List(ListArgs),

    /// Show a single record
    Show(ShowArgs),

    /// Edit an existing record
    Edit(EditArgs),

    /// Remove a record
    Remove(RemoveArgs),

    /// Change the vault passphrase
    Passwd,

    /// List record kinds and their default fields
    Kinds,
}

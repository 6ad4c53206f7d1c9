//! Command handlers, one module per subcommand group.

mod init;
mod kinds;
mod passwd;
mod records;

pub use init::handle_init;
pub use kinds::handle_kinds;
pub use passwd::handle_passwd;
pub use records::{handle_add, handle_edit, handle_list, handle_remove, handle_show};

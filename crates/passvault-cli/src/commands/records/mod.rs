//! Record commands: add, list, show, edit, remove.

mod add;
mod edit;
mod list;
mod remove;
mod show;

pub use add::handle_add;
pub use edit::handle_edit;
pub use list::handle_list;
pub use remove::handle_remove;
pub use show::handle_show;

//! Link management commands

mod add;
mod list;
mod remove;
mod resolve;
mod suggest;

pub use add::add_link;
pub use list::{list_links, search_links};
pub use remove::remove_link;
pub use resolve::resolve_link;
pub use suggest::suggest_aliases;

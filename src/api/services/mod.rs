pub mod helpers;
pub mod links;
pub mod redirect;

pub use links::{LinkService, link_routes};
pub use redirect::{RedirectService, redirect_routes};

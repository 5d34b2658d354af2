//! Dashboard Views
//!
//! Server-rendered HTML for the sidebar layout and its three pages.
//!
//! - [`route`] / [`active_links`]: pure functions of the browser path
//! - [`Layout`]: page skeleton built once at startup

mod html;
mod layout;
mod pages;
mod router;

pub use html::{html_escape, script_json};
pub use layout::{Layout, RenderedPage};
pub use pages::{analytics_page, home_page, not_found_page, upload_page};
pub use router::{active_links, route, ViewTag};

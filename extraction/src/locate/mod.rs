//! Locating the page, and then the region within it, that holds a target table.

pub mod page;
pub mod region;

pub use page::{PageMatch, locate_page};
pub use region::locate_region;

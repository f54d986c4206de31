pub mod links;
pub mod web;

pub use links::{VisitedSet, discover_links, extract_links};
pub use web::crawl;

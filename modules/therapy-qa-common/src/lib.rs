pub mod classify;
pub mod config;
pub mod quality;
pub mod text;
pub mod types;

pub use classify::{Taxonomy, DEFAULT_TAXONOMY};
pub use config::{Config, ScrapeConfig};
pub use quality::is_valid_qa;
pub use text::clean_text;
pub use types::*;

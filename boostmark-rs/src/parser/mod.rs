//! Parsers for note records and note content.

pub mod content;
pub mod cson;
pub mod marker;
pub mod title;

pub use content::adjust_content;
pub use cson::parse_cson;
pub use marker::{extract_attachment_refs, strip_markers};
pub use title::normalize_name;

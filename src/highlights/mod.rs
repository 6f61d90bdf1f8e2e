mod extractor;
mod types;

pub use extractor::{extract_highlights, extract_local_highlights};
pub use types::FileHighlights;

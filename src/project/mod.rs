mod marker;
mod template;

pub use marker::{markers_from_highlights, seconds_to_ticks, Marker, EDIT_RATE, MARKER_LABEL};
pub use template::ProjectTemplate;

pub mod r#box;
pub use r#box::{find_boxes, read_box_header, BoxHeader, BoxIndex, Mp4Box};
pub mod ftyp;
pub use ftyp::{parse_ftyp_brand, read_container_format, require_root_ftyp, ContainerFormat};
pub mod gpmf;
pub use gpmf::{
    scan_highlight_records, scan_highlights, HighlightRecord, HighlightScanState,
    RECORD_STRIDE_BYTES,
};

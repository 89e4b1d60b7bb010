mod blob;
mod bytes;
mod error;
mod header;
mod image;
mod path;
mod property;
mod scan;
mod trace;
mod walk;

/// Validated blob view.
pub use blob::Fdt;
/// Error and result aliases.
pub use error::{FdtError, Result};
/// Header layout, acceptance rules, and validation entry points.
pub use header::{FDT_MAGIC, FdtHeader, HeaderFault, Validation, validate_header, validate_header_with};
/// Image loading with optional zstd decompression.
pub use image::{Compression, Image, MAX_IMAGE_BYTES, ZSTD_MAGIC, decode_bytes};
/// Path depth counting and target matching.
pub use path::{Miss, SegmentMiss, Target, match_segment, path_depth};
/// Property records and the query API.
pub use property::{Property, get_property, get_property_bytes, get_property_str, get_property_u32};
/// Blob scanning inside larger buffers.
pub use scan::{find_blob_offset, locate_blob, scan_blob};
/// Tree trace events.
pub use trace::{TraceEvent, TraceSink};
/// Structure block walker.
pub use walk::{MAX_DEPTH, Tag, Walker};

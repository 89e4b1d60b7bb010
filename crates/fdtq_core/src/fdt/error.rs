use thiserror::Error;

use crate::fdt::HeaderFault;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, FdtError>;

/// Errors produced while locating, validating, and walking FDT blobs.
#[derive(Debug, Error)]
pub enum FdtError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Header at `offset` failed validation.
	#[error("invalid header at offset {offset}: {fault}")]
	InvalidHeader {
		/// Byte offset of the probed header.
		offset: usize,
		/// First check that failed.
		fault: HeaderFault,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Structure block does not open with a `BEGIN_NODE` tag.
	#[error("structure block does not start with a root node (tag=0x{tag:x})")]
	MissingRoot {
		/// First tag found.
		tag: u32,
	},
	/// Root node carried a name.
	#[error("root node name is not empty: {name:?}")]
	NamedRoot {
		/// Name found on the root node.
		name: String,
	},
	/// Non-root node had an empty name.
	#[error("empty node name at structure offset {at}")]
	EmptyNodeName {
		/// Structure block offset of the `BEGIN_NODE` tag.
		at: usize,
	},
	/// Nesting reached the traversal ceiling.
	#[error("tree too deep (max={max})")]
	TreeTooDeep {
		/// Maximum supported depth.
		max: usize,
	},
	/// Property length does not fit a signed 32-bit value.
	#[error("property {name} length {len} out of range")]
	PropertyTooLarge {
		/// Property name.
		name: String,
		/// Declared payload length.
		len: u32,
	},
	/// Property name offset points outside the strings block.
	#[error("string offset {offset} outside strings block of {size} bytes")]
	StringOffsetOutOfRange {
		/// Declared name offset.
		offset: u32,
		/// Strings block size.
		size: usize,
	},
	/// Structure block held an unknown tag value.
	#[error("unknown tag 0x{tag:x} at structure offset {at}")]
	UnknownTag {
		/// Raw tag value.
		tag: u32,
		/// Structure block offset of the tag.
		at: usize,
	},
	/// Target path contains an empty segment.
	#[error("invalid node path: {path}")]
	InvalidPath {
		/// Original user-provided path string.
		path: String,
	},
	/// No blob passed validation inside the scanned buffer.
	#[error("no device tree blob found")]
	BlobNotFound,
	/// Requested property does not exist at the requested path.
	#[error("property {name} not found at {path}")]
	PropertyNotFound {
		/// Requested node path.
		path: String,
		/// Requested property name.
		name: String,
	},
	/// Property exists but cannot be read as the requested type.
	#[error("property {name} is not a {expected} (len={len})")]
	PropertyType {
		/// Property name.
		name: String,
		/// Requested interpretation.
		expected: &'static str,
		/// Actual payload length.
		len: u32,
	},
}

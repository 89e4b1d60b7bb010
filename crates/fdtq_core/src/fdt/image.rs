use std::fs;
use std::io::Read;
use std::path::Path;

use crate::fdt::{Fdt, FdtError, Result, scan_blob};

/// zstd frame magic.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];
/// Largest decompressed image accepted.
pub const MAX_IMAGE_BYTES: usize = 512 * 1024 * 1024;

/// How the image was stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Used as read.
	Raw,
	/// One or more zstd frames.
	Zstd,
}

impl Compression {
	/// Stable lowercase label for reports.
	pub fn label(self) -> &'static str {
		match self {
			Self::Raw => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Firmware image held in memory, decompressed if needed.
///
/// Blobs found in the image borrow from it.
pub struct Image {
	/// Storage detected when the image was loaded.
	pub compression: Compression,
	bytes: Vec<u8>,
}

impl Image {
	/// Read an image from disk.
	///
	/// Files starting with [`ZSTD_MAGIC`] are decompressed, failing with
	/// [`FdtError::DecompressedTooLarge`] past [`MAX_IMAGE_BYTES`]. Anything else
	/// is scanned as is.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Self::from_bytes(fs::read(path)?)
	}

	/// [`Image::open`] for bytes already in memory.
	pub fn from_bytes(raw: Vec<u8>) -> Result<Self> {
		let (compression, bytes) = decode_bytes(raw)?;
		Ok(Self { compression, bytes })
	}

	/// Decoded image bytes.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Locate the first valid blob in the image.
	pub fn locate(&self, max_size: Option<u32>) -> Result<Fdt<'_>> {
		scan_blob(&self.bytes, max_size)
	}
}

/// Detect zstd by its magic and decode, returning the storage mode and the image bytes.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	decode_with_limit(raw, MAX_IMAGE_BYTES)
}

fn decode_with_limit(raw: Vec<u8>, limit: usize) -> Result<(Compression, Vec<u8>)> {
	if !raw.starts_with(&ZSTD_MAGIC) {
		return Ok((Compression::Raw, raw));
	}

	let decoder = zstd::stream::read::Decoder::new(raw.as_slice())?;
	let mut out = Vec::new();
	// One byte past the limit is enough to tell an oversized stream apart.
	decoder.take(limit as u64 + 1).read_to_end(&mut out)?;
	if out.len() > limit {
		return Err(FdtError::DecompressedTooLarge { limit });
	}
	log::debug!("decompressed zstd image: {} -> {} bytes", raw.len(), out.len());
	Ok((Compression::Zstd, out))
}

use crate::fdt::{FdtError, FdtHeader, Result};

/// Validated view of one FDT blob inside a caller-owned buffer.
///
/// The view never copies; every name and payload handed out borrows the
/// original buffer.
#[derive(Debug, Clone, Copy)]
pub struct Fdt<'a> {
	header: FdtHeader,
	bytes: &'a [u8],
	offset: usize,
}

impl<'a> Fdt<'a> {
	/// Validate a blob that starts at the beginning of `bytes`.
	pub fn new(bytes: &'a [u8]) -> Result<Self> {
		Self::at(bytes, 0)
	}

	/// Validate a blob that starts at `offset` inside `buffer`.
	///
	/// The view is clipped to the declared total size, or to the end of the
	/// buffer when the blob is cut short; reads past the clip fail cleanly.
	pub fn at(buffer: &'a [u8], offset: usize) -> Result<Self> {
		let header = FdtHeader::parse(buffer, offset)?;
		let total_size = header.check().map_err(|fault| FdtError::InvalidHeader { offset, fault })?;

		let rest = &buffer[offset..];
		let end = rest.len().min(total_size as usize);
		Ok(Self {
			header,
			bytes: &rest[..end],
			offset,
		})
	}

	/// Parsed header.
	pub fn header(&self) -> &FdtHeader {
		&self.header
	}

	/// Byte offset of the blob inside the buffer it was found in.
	pub fn offset(&self) -> usize {
		self.offset
	}

	/// Declared total size.
	pub fn total_size(&self) -> u32 {
		self.header.total_size
	}

	/// Blob bytes, starting at the header.
	pub fn bytes(&self) -> &'a [u8] {
		self.bytes
	}

	/// Whether the buffer ended before the declared total size.
	pub fn is_truncated(&self) -> bool {
		self.bytes.len() < self.header.total_size as usize
	}

	/// Structure block, clipped to the available bytes.
	pub fn structure_block(&self) -> &'a [u8] {
		self.clip(self.header.struct_range())
	}

	/// Strings block, clipped to the available bytes.
	pub fn strings_block(&self) -> &'a [u8] {
		self.clip(self.header.strings_range())
	}

	fn clip(&self, range: std::ops::Range<usize>) -> &'a [u8] {
		let len = self.bytes.len();
		&self.bytes[range.start.min(len)..range.end.min(len)]
	}
}

#[cfg(test)]
mod tests;

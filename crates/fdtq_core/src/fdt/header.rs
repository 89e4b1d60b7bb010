use std::fmt;
use std::ops::Range;

use crate::fdt::bytes::be32_at;
use crate::fdt::{FdtError, Result};

/// Magic word stored big-endian in the first header field.
pub const FDT_MAGIC: u32 = 0xd00d_feed;

/// Depth of checks applied by [`validate_header`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
	/// Magic and total-size bounds only.
	Cheap,
	/// Every acceptance rule, including versions, block bounds, and boot CPU.
	Full,
}

/// Reason a header was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFault {
	/// Buffer ends before the fields the validation mode reads.
	Truncated,
	/// First word is not [`FDT_MAGIC`].
	BadMagic {
		/// Word found at the probed offset.
		found: u32,
	},
	/// Total size is below the minimum or not representable as `i32`.
	TotalSize {
		/// Declared total size.
		size: u32,
	},
	/// Version pair other than 17/16.
	Version {
		/// Declared format version.
		version: u32,
		/// Declared last compatible version.
		last_comp_version: u32,
	},
	/// Structure block lies outside the blob.
	StructBlock {
		/// Declared block offset.
		offset: u32,
		/// Declared block size.
		size: u32,
	},
	/// Strings block lies outside the blob.
	StringsBlock {
		/// Declared block offset.
		offset: u32,
		/// Declared block size.
		size: u32,
	},
	/// Boot CPU physical id is not zero.
	BootCpu {
		/// Declared boot CPU id.
		id: u32,
	},
}

impl fmt::Display for HeaderFault {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Truncated => write!(f, "truncated header"),
			Self::BadMagic { found } => write!(f, "bad magic 0x{found:08x}"),
			Self::TotalSize { size } => write!(f, "total size {size} out of range"),
			Self::Version { version, last_comp_version } => {
				write!(f, "unsupported version {version} (last compatible {last_comp_version})")
			}
			Self::StructBlock { offset, size } => write!(f, "structure block {offset}+{size} out of range"),
			Self::StringsBlock { offset, size } => write!(f, "strings block {offset}+{size} out of range"),
			Self::BootCpu { id } => write!(f, "boot cpu id {id} is not 0"),
		}
	}
}

/// Parsed FDT header fields, in on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FdtHeader {
	/// Magic word, [`FDT_MAGIC`] for valid blobs.
	pub magic: u32,
	/// Total blob size in bytes.
	pub total_size: u32,
	/// Structure block offset from the header start.
	pub off_dt_struct: u32,
	/// Strings block offset from the header start.
	pub off_dt_strings: u32,
	/// Memory reservation map offset from the header start.
	pub off_mem_rsvmap: u32,
	/// Format version.
	pub version: u32,
	/// Lowest version this blob is backwards compatible with.
	pub last_comp_version: u32,
	/// Physical id of the boot CPU.
	pub boot_cpuid_phys: u32,
	/// Strings block size in bytes.
	pub size_dt_strings: u32,
	/// Structure block size in bytes.
	pub size_dt_struct: u32,
}

impl FdtHeader {
	/// Header size in bytes (ten big-endian words).
	pub const SIZE: usize = 40;
	/// Smallest acceptable total size.
	pub const MIN_TOTAL_SIZE: u32 = Self::SIZE as u32 + 128;
	/// The only accepted format version.
	pub const VERSION: u32 = 17;
	/// The only accepted last compatible version.
	pub const LAST_COMP_VERSION: u32 = 16;

	/// Read all header fields at `offset` without validating them.
	pub fn parse(bytes: &[u8], offset: usize) -> Result<Self> {
		let field = |index: usize| {
			be32_at(bytes, offset.saturating_add(index * 4)).ok_or(FdtError::InvalidHeader {
				offset,
				fault: HeaderFault::Truncated,
			})
		};

		Ok(Self {
			magic: field(0)?,
			total_size: field(1)?,
			off_dt_struct: field(2)?,
			off_dt_strings: field(3)?,
			off_mem_rsvmap: field(4)?,
			version: field(5)?,
			last_comp_version: field(6)?,
			boot_cpuid_phys: field(7)?,
			size_dt_strings: field(8)?,
			size_dt_struct: field(9)?,
		})
	}

	/// Check every acceptance rule and return the total size.
	pub fn check(&self) -> std::result::Result<u32, HeaderFault> {
		if self.magic != FDT_MAGIC {
			return Err(HeaderFault::BadMagic { found: self.magic });
		}
		check_size(self.total_size)?;

		if self.version != Self::VERSION || self.last_comp_version != Self::LAST_COMP_VERSION {
			return Err(HeaderFault::Version {
				version: self.version,
				last_comp_version: self.last_comp_version,
			});
		}

		if !block_in_bounds(self.off_dt_struct, self.size_dt_struct, self.total_size) {
			return Err(HeaderFault::StructBlock {
				offset: self.off_dt_struct,
				size: self.size_dt_struct,
			});
		}

		if !block_in_bounds(self.off_dt_strings, self.size_dt_strings, self.total_size) {
			return Err(HeaderFault::StringsBlock {
				offset: self.off_dt_strings,
				size: self.size_dt_strings,
			});
		}

		if self.boot_cpuid_phys != 0 {
			return Err(HeaderFault::BootCpu { id: self.boot_cpuid_phys });
		}

		Ok(self.total_size)
	}

	/// Structure block byte range relative to the header start.
	pub fn struct_range(&self) -> Range<usize> {
		block_range(self.off_dt_struct, self.size_dt_struct)
	}

	/// Strings block byte range relative to the header start.
	pub fn strings_range(&self) -> Range<usize> {
		block_range(self.off_dt_strings, self.size_dt_strings)
	}
}

/// Validate the header at `offset` and return the blob's total size.
///
/// `full == false` runs [`Validation::Cheap`], which only reads the first two words.
pub fn validate_header(bytes: &[u8], offset: usize, full: bool) -> Result<u32> {
	let mode = if full { Validation::Full } else { Validation::Cheap };
	validate_header_with(bytes, offset, mode)
}

/// [`validate_header`] with an explicit [`Validation`] mode.
pub fn validate_header_with(bytes: &[u8], offset: usize, mode: Validation) -> Result<u32> {
	let reject = |fault| FdtError::InvalidHeader { offset, fault };

	match mode {
		Validation::Cheap => {
			let magic = be32_at(bytes, offset).ok_or(reject(HeaderFault::Truncated))?;
			if magic != FDT_MAGIC {
				return Err(reject(HeaderFault::BadMagic { found: magic }));
			}
			let total_size = be32_at(bytes, offset.saturating_add(4)).ok_or(reject(HeaderFault::Truncated))?;
			check_size(total_size).map_err(reject)
		}
		Validation::Full => FdtHeader::parse(bytes, offset)?.check().map_err(reject),
	}
}

fn check_size(total_size: u32) -> std::result::Result<u32, HeaderFault> {
	if total_size >= i32::MAX as u32 || total_size < FdtHeader::MIN_TOTAL_SIZE {
		return Err(HeaderFault::TotalSize { size: total_size });
	}
	Ok(total_size)
}

fn block_in_bounds(offset: u32, size: u32, total_size: u32) -> bool {
	if offset as usize <= FdtHeader::SIZE || offset >= total_size {
		return false;
	}
	u64::from(offset) + u64::from(size) <= u64::from(total_size)
}

fn block_range(offset: u32, size: u32) -> Range<usize> {
	let start = offset as usize;
	start..start + size as usize
}

#[cfg(test)]
mod tests;

use crate::fdt::bytes::be32_at;
use crate::fdt::{FDT_MAGIC, Fdt, FdtError, FdtHeader, Result, validate_header};

/// Find the first byte offset holding a fully valid FDT header.
///
/// Every offset is probed, not only aligned ones. A non-zero `max_size`
/// skips blobs that declare a larger total size. Scanning stops once fewer
/// than `FdtHeader::SIZE + 8` bytes remain, so no header read can run past
/// the buffer.
pub fn find_blob_offset(bytes: &[u8], max_size: Option<u32>) -> Option<usize> {
	let limit = bytes.len().checked_sub(FdtHeader::SIZE + 8)?;
	let cap = max_size.filter(|size| *size > 0);

	(0..limit).find(|&pos| {
		if be32_at(bytes, pos) != Some(FDT_MAGIC) {
			return false;
		}
		match validate_header(bytes, pos, true) {
			Ok(total_size) => match cap {
				Some(cap) if total_size > cap => {
					log::trace!("skipping blob at {pos}: size {total_size} above cap {cap}");
					false
				}
				_ => true,
			},
			Err(err) => {
				log::trace!("skipping magic at {pos}: {err}");
				false
			}
		}
	})
}

/// Find and open the first valid blob inside `bytes`.
pub fn locate_blob(bytes: &[u8], max_size: Option<u32>) -> Option<Fdt<'_>> {
	let offset = find_blob_offset(bytes, max_size)?;
	Fdt::at(bytes, offset).ok()
}

/// [`locate_blob`] reporting a miss as [`FdtError::BlobNotFound`].
pub fn scan_blob(bytes: &[u8], max_size: Option<u32>) -> Result<Fdt<'_>> {
	let offset = find_blob_offset(bytes, max_size).ok_or(FdtError::BlobNotFound)?;
	let fdt = Fdt::at(bytes, offset)?;
	log::debug!("found fdt at offset {offset} ({} bytes)", fdt.total_size());
	Ok(fdt)
}

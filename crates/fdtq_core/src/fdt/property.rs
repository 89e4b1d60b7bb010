use std::borrow::Cow;

use crate::fdt::{Fdt, Result, Target, TraceEvent, TraceSink, Walker, path_depth};

/// Raw property record borrowed from the structure block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property<'a> {
	/// Property name from the strings block.
	pub name: &'a str,
	/// Payload bytes, without alignment padding.
	pub data: &'a [u8],
	/// Offset of the `PROP` tag from the start of the blob.
	pub offset: usize,
}

impl<'a> Property<'a> {
	/// Declared payload length.
	pub fn len(&self) -> u32 {
		self.data.len() as u32
	}

	/// Whether the payload is empty (a boolean property).
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Payload as one big-endian cell; `None` unless the length is exactly 4.
	pub fn as_u32(&self) -> Option<u32> {
		let raw: [u8; 4] = self.data.try_into().ok()?;
		Some(u32::from_be_bytes(raw))
	}

	/// Payload as a NUL-terminated string, without the terminator.
	///
	/// Requires a non-empty payload whose last byte is NUL. For string lists
	/// only the first entry is returned.
	pub fn as_str(&self) -> Option<&'a str> {
		let (last, _) = self.data.split_last()?;
		if *last != 0 {
			return None;
		}
		let end = self.data.iter().position(|byte| *byte == 0).unwrap_or(self.data.len());
		std::str::from_utf8(&self.data[..end]).ok()
	}

	/// Display text when every byte but the last is printable ASCII.
	pub fn printable_text(&self) -> Option<Cow<'a, str>> {
		let (last, head) = self.data.split_last()?;
		if !head.iter().all(|byte| (0x20..=0x7e).contains(byte)) {
			return None;
		}
		if *last == 0 {
			return Some(String::from_utf8_lossy(head));
		}
		Some(String::from_utf8_lossy(self.data))
	}
}

impl<'a> Fdt<'a> {
	/// Find property `name` on the node at `path`.
	///
	/// `path` segments may end in `*` to match by prefix. A missing or `/`
	/// path addresses the root node. `Ok(None)` is a clean miss.
	pub fn find_property(&self, path: Option<&str>, name: &str) -> Result<Option<Property<'a>>> {
		let target = Target::new(path, Some(name))?;
		Walker::new(self).with_target(target).run()
	}

	/// Payload and length of a property.
	pub fn property_bytes(&self, path: Option<&str>, name: &str) -> Result<Option<(&'a [u8], u32)>> {
		Ok(self.find_property(path, name)?.map(|prop| (prop.data, prop.len())))
	}

	/// Property read as a big-endian `u32`; `Ok(None)` when missing or not 4 bytes long.
	pub fn property_u32(&self, path: Option<&str>, name: &str) -> Result<Option<u32>> {
		Ok(self.find_property(path, name)?.and_then(|prop| prop.as_u32()))
	}

	/// Property read as a string; `Ok(None)` when missing or not NUL-terminated.
	pub fn property_str(&self, path: Option<&str>, name: &str) -> Result<Option<&'a str>> {
		Ok(self.find_property(path, name)?.and_then(|prop| prop.as_str()))
	}

	/// Walk the whole tree, reporting every node and property to `sink`.
	pub fn dump(&self, sink: &mut TraceSink<'_>) -> Result<()> {
		Walker::new(self).with_trace(sink).run().map(|_| ())
	}
}

/// Look up a property in the blob that starts at `blob[0]`.
///
/// Without a `name` the call only emits the tree trace (as `info` records on
/// the `fdtq::tree` log target) and returns `None`. Every error collapses to
/// `None` and is logged.
pub fn get_property<'a>(blob: &'a [u8], path: Option<&str>, name: Option<&str>) -> Option<Property<'a>> {
	let fdt = match Fdt::new(blob) {
		Ok(fdt) => fdt,
		Err(err) => {
			log::debug!("fdt lookup rejected blob: {err}");
			return None;
		}
	};

	let Some(name) = name else {
		trace_tree(&fdt, path);
		return None;
	};

	match fdt.find_property(path, name) {
		Ok(found) => found,
		Err(err) => {
			log::debug!("fdt lookup {}:{name} failed: {err}", path.unwrap_or("/"));
			None
		}
	}
}

/// [`get_property`] returning the payload and its length.
pub fn get_property_bytes<'a>(blob: &'a [u8], path: Option<&str>, name: Option<&str>) -> Option<(&'a [u8], u32)> {
	get_property(blob, path, name).map(|prop| (prop.data, prop.len()))
}

/// [`get_property`] read as a big-endian `u32`.
///
/// Both "missing" and "not 4 bytes long" report `None`.
pub fn get_property_u32(blob: &[u8], path: Option<&str>, name: Option<&str>) -> Option<u32> {
	get_property(blob, path, name)?.as_u32()
}

/// [`get_property`] read as a NUL-terminated string.
pub fn get_property_str<'a>(blob: &'a [u8], path: Option<&str>, name: Option<&str>) -> Option<&'a str> {
	get_property(blob, path, name)?.as_str()
}

fn trace_tree(fdt: &Fdt<'_>, path: Option<&str>) {
	if let Some(path) = path
		&& let Err(err) = path_depth(path)
	{
		log::warn!("{err}");
		return;
	}

	let mut sink = |event: &TraceEvent<'_>| log::info!(target: "fdtq::tree", "{event}");
	if let Err(err) = fdt.dump(&mut sink) {
		log::warn!("fdt tree walk aborted: {err}");
	}
}

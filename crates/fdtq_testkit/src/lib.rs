//! Shared test helpers for workspace crates.
//!
//! [`FdtBuilder`] assembles small version-17 blobs in memory so tests do not
//! depend on binary fixtures checked into the repository.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Big-endian header word offsets, in on-disk order.
pub mod field {
	/// Magic word.
	pub const MAGIC: usize = 0;
	/// Total blob size.
	pub const TOTAL_SIZE: usize = 4;
	/// Structure block offset.
	pub const OFF_DT_STRUCT: usize = 8;
	/// Strings block offset.
	pub const OFF_DT_STRINGS: usize = 12;
	/// Memory reservation map offset.
	pub const OFF_MEM_RSVMAP: usize = 16;
	/// Format version.
	pub const VERSION: usize = 20;
	/// Last compatible version.
	pub const LAST_COMP_VERSION: usize = 24;
	/// Boot CPU physical id.
	pub const BOOT_CPUID_PHYS: usize = 28;
	/// Strings block size.
	pub const SIZE_DT_STRINGS: usize = 32;
	/// Structure block size.
	pub const SIZE_DT_STRUCT: usize = 36;
}

const MAGIC: u32 = 0xd00d_feed;
const HEADER_SIZE: usize = 40;
const RSVMAP_SIZE: usize = 16;
const MIN_TOTAL_SIZE: usize = HEADER_SIZE + 128;

const BEGIN_NODE: u32 = 0x1;
const END_NODE: u32 = 0x2;
const PROP: u32 = 0x3;
const NOP: u32 = 0x4;
const END: u32 = 0x9;

/// Incremental writer for structure and strings blocks.
///
/// Calls are recorded verbatim, so unbalanced or malformed streams can be
/// produced on purpose.
#[derive(Debug, Default, Clone)]
pub struct FdtBuilder {
	structure: Vec<u8>,
	strings: Vec<u8>,
}

impl FdtBuilder {
	/// Start an empty structure block.
	pub fn new() -> Self {
		Self::default()
	}

	/// Emit `BEGIN_NODE` with a padded name.
	pub fn begin_node(mut self, name: &str) -> Self {
		self.word(BEGIN_NODE);
		self.structure.extend_from_slice(name.as_bytes());
		self.structure.push(0);
		self.pad();
		self
	}

	/// Emit `END_NODE`.
	pub fn end_node(mut self) -> Self {
		self.word(END_NODE);
		self
	}

	/// Emit a `PROP` record with raw payload bytes.
	pub fn prop(mut self, name: &str, data: &[u8]) -> Self {
		let nameoff = self.intern(name);
		self.word(PROP);
		self.word(data.len() as u32);
		self.word(nameoff);
		self.structure.extend_from_slice(data);
		self.pad();
		self
	}

	/// Emit a property holding one big-endian cell.
	pub fn prop_u32(self, name: &str, value: u32) -> Self {
		self.prop(name, &value.to_be_bytes())
	}

	/// Emit a property holding a NUL-terminated string.
	pub fn prop_str(self, name: &str, value: &str) -> Self {
		let mut data = value.as_bytes().to_vec();
		data.push(0);
		self.prop(name, &data)
	}

	/// Emit `NOP`.
	pub fn nop(mut self) -> Self {
		self.word(NOP);
		self
	}

	/// Emit `END`.
	pub fn end(mut self) -> Self {
		self.word(END);
		self
	}

	/// Emit an arbitrary word, for malformed streams.
	pub fn raw_word(mut self, value: u32) -> Self {
		self.word(value);
		self
	}

	/// Lay out header, empty reservation map, structure block, and strings block.
	pub fn build(&self) -> Vec<u8> {
		let off_struct = HEADER_SIZE + RSVMAP_SIZE;
		let off_strings = off_struct + self.structure.len();
		let end = off_strings + self.strings.len();
		let total = end.max(MIN_TOTAL_SIZE);

		let mut blob = vec![0_u8; total];
		patch_be32(&mut blob, field::MAGIC, MAGIC);
		patch_be32(&mut blob, field::TOTAL_SIZE, total as u32);
		patch_be32(&mut blob, field::OFF_DT_STRUCT, off_struct as u32);
		patch_be32(&mut blob, field::OFF_DT_STRINGS, off_strings as u32);
		patch_be32(&mut blob, field::OFF_MEM_RSVMAP, HEADER_SIZE as u32);
		patch_be32(&mut blob, field::VERSION, 17);
		patch_be32(&mut blob, field::LAST_COMP_VERSION, 16);
		patch_be32(&mut blob, field::BOOT_CPUID_PHYS, 0);
		patch_be32(&mut blob, field::SIZE_DT_STRINGS, self.strings.len() as u32);
		patch_be32(&mut blob, field::SIZE_DT_STRUCT, self.structure.len() as u32);
		blob[off_struct..off_strings].copy_from_slice(&self.structure);
		blob[off_strings..end].copy_from_slice(&self.strings);
		blob
	}

	fn word(&mut self, value: u32) {
		self.structure.extend_from_slice(&value.to_be_bytes());
	}

	fn pad(&mut self) {
		while self.structure.len() % 4 != 0 {
			self.structure.push(0);
		}
	}

	fn intern(&mut self, name: &str) -> u32 {
		let mut start = 0;
		while start < self.strings.len() {
			let end = start + self.strings[start..].iter().position(|byte| *byte == 0).unwrap_or(0);
			if &self.strings[start..end] == name.as_bytes() {
				return start as u32;
			}
			start = end + 1;
		}

		let offset = self.strings.len() as u32;
		self.strings.extend_from_slice(name.as_bytes());
		self.strings.push(0);
		offset
	}
}

/// Overwrite one big-endian word in place.
pub fn patch_be32(blob: &mut [u8], offset: usize, value: u32) {
	blob[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

/// Small board tree shared by most query tests.
///
/// ```text
/// / { compatible = "acme,board"; #address-cells = <1>;
///     soc { #size-cells = <1>;
///         uart@0 { compatible = "ns16550a"; reg = <0 0x100>; clock-frequency = <1843200>; }
///         uart@1000 { compatible = "ns16550a"; status = "okay"; }
///         spi@2000 { compatible = "acme,spi"; flash@0 { compatible = "jedec,spi-nor"; }; }
///     }
///     chosen { bootargs = "console=ttyS0"; }
/// }
/// ```
pub fn sample_blob() -> Vec<u8> {
	let mut reg = Vec::new();
	reg.extend_from_slice(&0_u32.to_be_bytes());
	reg.extend_from_slice(&0x100_u32.to_be_bytes());

	FdtBuilder::new()
		.begin_node("")
		.prop_str("compatible", "acme,board")
		.prop_u32("#address-cells", 1)
		.begin_node("soc")
		.prop_u32("#size-cells", 1)
		.begin_node("uart@0")
		.prop_str("compatible", "ns16550a")
		.prop("reg", &reg)
		.prop_u32("clock-frequency", 1_843_200)
		.end_node()
		.nop()
		.begin_node("uart@1000")
		.prop_str("compatible", "ns16550a")
		.prop_str("status", "okay")
		.end_node()
		.begin_node("spi@2000")
		.prop_str("compatible", "acme,spi")
		.begin_node("flash@0")
		.prop_str("compatible", "jedec,spi-nor")
		.end_node()
		.end_node()
		.end_node()
		.begin_node("chosen")
		.prop_str("bootargs", "console=ttyS0")
		.end_node()
		.end_node()
		.end()
		.build()
}

/// Chain of `levels` nodes counting the root; the deepest node carries `leaf = <levels>`.
pub fn nested_blob(levels: usize) -> Vec<u8> {
	let mut builder = FdtBuilder::new().begin_node("");
	for level in 1..levels {
		builder = builder.begin_node(&format!("n{level}"));
	}
	builder = builder.prop_u32("leaf", levels as u32);
	for _ in 0..levels {
		builder = builder.end_node();
	}
	builder.end().build()
}

/// Node path matching [`nested_blob`]'s deepest node.
pub fn nested_path(levels: usize) -> String {
	let mut path = String::new();
	for level in 1..levels {
		path.push_str(&format!("/n{level}"));
	}
	if path.is_empty() {
		path.push('/');
	}
	path
}

/// Wrap `blob` between filler bytes that never contain the FDT magic.
pub fn embed(blob: &[u8], prefix: usize, suffix: usize) -> Vec<u8> {
	let mut image = vec![0xa5_u8; prefix];
	image.extend_from_slice(blob);
	image.extend(std::iter::repeat_n(0x5a_u8, suffix));
	image
}

/// Compress `bytes` as one zstd frame.
pub fn zstd_compress(bytes: &[u8]) -> Vec<u8> {
	zstd::encode_all(bytes, 3).expect("zstd encode succeeds")
}

/// Write `bytes` to a fresh file under the system temp directory.
pub fn temp_image(name: &str, bytes: &[u8]) -> PathBuf {
	static NEXT: AtomicUsize = AtomicUsize::new(0);

	let dir = std::env::temp_dir().join(format!("fdtq-test-{}", std::process::id()));
	std::fs::create_dir_all(&dir).expect("temp dir is writable");
	let path = dir.join(format!("{}-{name}", NEXT.fetch_add(1, Ordering::Relaxed)));
	std::fs::write(&path, bytes).expect("temp image is writable");
	path
}

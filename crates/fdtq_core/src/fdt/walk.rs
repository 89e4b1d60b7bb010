use crate::fdt::bytes::Cursor;
use crate::fdt::{Fdt, FdtError, Miss, Property, Result, Target, TraceEvent, TraceSink};

/// Deepest node nesting the walker accepts; the root is depth 0.
pub const MAX_DEPTH: usize = 32;

/// Structure block record tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Tag {
	/// Start of a node, followed by its padded name.
	BeginNode = 0x1,
	/// End of the innermost open node.
	EndNode = 0x2,
	/// Property: length, name offset, padded payload.
	Prop = 0x3,
	/// Padding word.
	Nop = 0x4,
	/// End of the structure block.
	End = 0x9,
}

impl Tag {
	/// Decode a raw tag word.
	pub fn from_raw(raw: u32) -> Option<Self> {
		match raw {
			0x1 => Some(Self::BeginNode),
			0x2 => Some(Self::EndNode),
			0x3 => Some(Self::Prop),
			0x4 => Some(Self::Nop),
			0x9 => Some(Self::End),
			_ => None,
		}
	}
}

/// How a frame of the walk finished.
enum Step<'a> {
	/// The frame's node closed; the parent keeps going.
	Closed,
	/// `END` was reached.
	Finished,
	/// The target property was found; unwind without reading further.
	Found(Property<'a>),
}

/// Per-query traversal state over one blob.
pub struct Walker<'a, 'q> {
	cursor: Cursor<'a>,
	struct_offset: usize,
	strings: &'a [u8],
	depth: Option<usize>,
	path: [&'a [u8]; MAX_DEPTH],
	target: Option<Target<'q>>,
	trace: Option<&'q mut TraceSink<'q>>,
}

impl<'a, 'q> Walker<'a, 'q> {
	/// Position a walker on the first structure tag of `fdt`.
	pub fn new(fdt: &Fdt<'a>) -> Self {
		Self {
			cursor: Cursor::new(fdt.structure_block()),
			struct_offset: fdt.header().off_dt_struct as usize,
			strings: fdt.strings_block(),
			depth: None,
			path: [b"".as_slice(); MAX_DEPTH],
			target: None,
			trace: None,
		}
	}

	/// Stop at the first property accepted by `target`.
	pub fn with_target(mut self, target: Target<'q>) -> Self {
		self.target = Some(target);
		self
	}

	/// Report every node and property to `sink` as it is read.
	pub fn with_trace(mut self, sink: &'q mut TraceSink<'q>) -> Self {
		self.trace = Some(sink);
		self
	}

	/// Walk until the target is found, `END` is reached, or the tree proves malformed.
	pub fn run(mut self) -> Result<Option<Property<'a>>> {
		let first = self.cursor.peek_u32_be()?;
		if Tag::from_raw(first) != Some(Tag::BeginNode) {
			return Err(FdtError::MissingRoot { tag: first });
		}

		match self.walk_records(0)? {
			Step::Found(prop) => Ok(Some(prop)),
			Step::Closed | Step::Finished => Ok(None),
		}
	}

	fn walk_records(&mut self, frame: usize) -> Result<Step<'a>> {
		loop {
			let at = self.cursor.pos();
			let raw = self.cursor.read_u32_be()?;
			let Some(tag) = Tag::from_raw(raw) else {
				return Err(FdtError::UnknownTag { tag: raw, at });
			};

			match tag {
				Tag::BeginNode => {
					self.begin_node(at)?;
					match self.walk_records(frame + 1)? {
						Step::Closed => {}
						done => return Ok(done),
					}
				}
				Tag::Prop => {
					if let Some(prop) = self.property(at)? {
						return Ok(Step::Found(prop));
					}
				}
				Tag::Nop => {}
				Tag::EndNode => {
					self.depth = self.depth.map(|depth| depth.saturating_sub(1));
					// An unbalanced END_NODE at the outermost frame is tolerated.
					if frame > 0 {
						return Ok(Step::Closed);
					}
				}
				Tag::End => return Ok(Step::Finished),
			}
		}
	}

	fn begin_node(&mut self, at: usize) -> Result<()> {
		let name = self.cursor.read_cstring_bytes()?;
		self.cursor.align4()?;

		let depth = match self.depth {
			None => {
				if !name.is_empty() {
					return Err(FdtError::NamedRoot {
						name: String::from_utf8_lossy(name).into_owned(),
					});
				}
				0
			}
			Some(depth) => {
				if name.is_empty() {
					return Err(FdtError::EmptyNodeName { at });
				}
				self.path[depth] = name;
				depth + 1
			}
		};
		self.depth = Some(depth);

		if let Some(sink) = self.trace.as_mut() {
			sink(&TraceEvent::Node { path: &self.path[..depth] });
		}

		if depth == MAX_DEPTH {
			return Err(FdtError::TreeTooDeep { max: MAX_DEPTH });
		}
		Ok(())
	}

	fn property(&mut self, at: usize) -> Result<Option<Property<'a>>> {
		let len = self.cursor.read_u32_be()?;
		let nameoff = self.cursor.read_u32_be()?;
		let raw_name = self.string(nameoff)?;
		if len >= i32::MAX as u32 {
			return Err(FdtError::PropertyTooLarge {
				name: String::from_utf8_lossy(raw_name).into_owned(),
				len,
			});
		}

		let data = self.cursor.read_exact(len as usize)?;
		self.cursor.align4()?;
		// A target name is UTF-8, so a name that is not can never match.
		let Ok(name) = std::str::from_utf8(raw_name) else {
			log::trace!("skipping property with non-utf-8 name at {}", self.struct_offset + at);
			return Ok(None);
		};
		let prop = Property {
			name,
			data,
			offset: self.struct_offset + at,
		};

		if let Some(sink) = self.trace.as_mut() {
			sink(&TraceEvent::Property(&prop));
		}

		let Some(target) = &self.target else {
			return Ok(None);
		};
		let depth = self.depth.unwrap_or(0);
		match target.check(depth, name, &self.path[..depth]) {
			Ok(()) => Ok(Some(prop)),
			Err(miss @ Miss::Segment { .. }) => {
				log::trace!("{name} at depth {depth} skipped: {miss:?}");
				Ok(None)
			}
			Err(_) => Ok(None),
		}
	}

	fn string(&self, nameoff: u32) -> Result<&'a [u8]> {
		let start = nameoff as usize;
		if start >= self.strings.len() {
			return Err(FdtError::StringOffsetOutOfRange {
				offset: nameoff,
				size: self.strings.len(),
			});
		}

		let mut cursor = Cursor::new(self.strings);
		cursor.skip(start)?;
		cursor.read_cstring_bytes()
	}
}

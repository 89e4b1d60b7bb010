use crate::fdt::{FdtError, Result};

/// Reason a path segment did not match its node name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentMiss {
	/// Exact segment and node name differ in length.
	Length,
	/// Exact segment and node name differ in content.
	Bytes,
	/// Node name is shorter than the wildcard prefix.
	PrefixTooShort,
	/// Node name does not start with the wildcard prefix.
	PrefixMismatch,
}

/// Reason a property was not accepted by a [`Target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
	/// Target has no property name, so nothing can match.
	Unarmed,
	/// Property sits at a different depth than the target path.
	Depth {
		/// Segment count of the target path.
		expected: usize,
		/// Current traversal depth.
		found: usize,
	},
	/// Property name differs from the target name.
	Name,
	/// A path segment rejected the node name at the same depth.
	Segment {
		/// Zero-based segment index.
		index: usize,
		/// How the segment failed.
		reason: SegmentMiss,
	},
}

/// Count the `/`-separated segments of an absolute node path.
///
/// One leading and one trailing `/` are ignored, so `/`, `""` and `//` all
/// name the root (depth 0). Interior empty segments are rejected.
pub fn path_depth(path: &str) -> Result<usize> {
	let trimmed = trim_path(path);
	if trimmed.is_empty() {
		return Ok(0);
	}

	let mut depth = 0_usize;
	for segment in trimmed.split('/') {
		if segment.is_empty() {
			return Err(FdtError::InvalidPath { path: path.to_owned() });
		}
		depth += 1;
	}
	Ok(depth)
}

/// Query-scoped lookup target: node path, its depth, and a property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target<'q> {
	segments: &'q str,
	depth: usize,
	name: Option<&'q str>,
}

impl<'q> Target<'q> {
	/// Build a target, rejecting malformed paths before any traversal.
	///
	/// A missing path is the root node.
	pub fn new(path: Option<&'q str>, name: Option<&'q str>) -> Result<Self> {
		let path = path.unwrap_or("");
		let depth = path_depth(path)?;
		Ok(Self {
			segments: trim_path(path),
			depth,
			name,
		})
	}

	/// Number of path segments.
	pub fn depth(&self) -> usize {
		self.depth
	}

	/// Property name being searched for.
	pub fn name(&self) -> Option<&'q str> {
		self.name
	}

	/// Path segments in order, without separators.
	pub fn segments(&self) -> impl Iterator<Item = &'q str> + use<'q> {
		self.segments.split('/').filter(|segment| !segment.is_empty())
	}

	/// Decide whether property `name` at `depth` under `stack` is the target.
	///
	/// `stack[i]` holds the raw node name at depth `i + 1`.
	pub fn check<S: AsRef<[u8]>>(&self, depth: usize, name: &str, stack: &[S]) -> std::result::Result<(), Miss> {
		let Some(target_name) = self.name else {
			return Err(Miss::Unarmed);
		};
		if depth != self.depth {
			return Err(Miss::Depth {
				expected: self.depth,
				found: depth,
			});
		}
		if name != target_name {
			return Err(Miss::Name);
		}

		for (index, segment) in self.segments().enumerate() {
			let node = stack.get(index).map_or(&[][..], AsRef::as_ref);
			match_segment(segment, node).map_err(|reason| Miss::Segment { index, reason })?;
		}
		Ok(())
	}

	/// [`Target::check`] as a plain predicate.
	pub fn matches<S: AsRef<[u8]>>(&self, depth: usize, name: &str, stack: &[S]) -> bool {
		self.check(depth, name, stack).is_ok()
	}
}

/// Match one segment against a raw node name; a trailing `*` turns the segment into a prefix.
///
/// Node names are compared as bytes, so names that are not UTF-8 can still be
/// matched by a wildcard.
pub fn match_segment(segment: &str, node: impl AsRef<[u8]>) -> std::result::Result<(), SegmentMiss> {
	let node = node.as_ref();
	if let Some(prefix) = segment.strip_suffix('*') {
		if node.len() < prefix.len() {
			return Err(SegmentMiss::PrefixTooShort);
		}
		if !node.starts_with(prefix.as_bytes()) {
			return Err(SegmentMiss::PrefixMismatch);
		}
		return Ok(());
	}

	if node.len() != segment.len() {
		return Err(SegmentMiss::Length);
	}
	if node != segment.as_bytes() {
		return Err(SegmentMiss::Bytes);
	}
	Ok(())
}

fn trim_path(path: &str) -> &str {
	let path = path.strip_prefix('/').unwrap_or(path);
	path.strip_suffix('/').unwrap_or(path)
}

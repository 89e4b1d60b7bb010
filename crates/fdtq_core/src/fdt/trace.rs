use std::fmt;

use crate::fdt::Property;

/// One line of the human-readable tree trace.
#[derive(Debug, Clone, Copy)]
pub enum TraceEvent<'e> {
	/// A node was entered; `path` holds the names below the root.
	Node {
		/// Raw node names from depth 1 to the entered node.
		path: &'e [&'e [u8]],
	},
	/// A property was read inside the most recently entered node.
	Property(&'e Property<'e>),
}

impl fmt::Display for TraceEvent<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Node { path } => {
				f.write_str("/")?;
				for name in *path {
					write!(f, "{}/", name.escape_ascii())?;
				}
				Ok(())
			}
			Self::Property(prop) => match prop.printable_text() {
				Some(text) => write!(f, "  {} = \"{}\"", prop.name, text),
				None => write!(f, "  {} = [size:{}]", prop.name, prop.len()),
			},
		}
	}
}

/// Callback receiving trace events during a walk.
pub type TraceSink<'s> = dyn FnMut(&TraceEvent<'_>) + 's;

use std::path::PathBuf;

use fdtq::fdt::{FdtError, Image, Property, Result};

use crate::cmd::util::{emit_json, hex_bytes};

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum ValueKind {
	/// Raw payload bytes.
	Bytes,
	/// One big-endian 32-bit cell.
	U32,
	/// NUL-terminated string.
	Str,
}

impl ValueKind {
	fn label(self) -> &'static str {
		match self {
			Self::Bytes => "bytes",
			Self::U32 => "u32",
			Self::Str => "string",
		}
	}
}

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Node path; segments ending in `*` match by prefix.
	pub node: String,
	/// Property name.
	pub name: String,
	#[arg(long = "as", value_enum, default_value_t = ValueKind::Bytes)]
	pub kind: ValueKind,
	#[arg(long = "max-size")]
	pub max_size: Option<u32>,
	#[arg(long)]
	pub json: bool,
}

/// Print one property of the first valid blob, read as the requested type.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		node,
		name,
		kind,
		max_size,
		json,
	} = args;

	let image = Image::open(&path)?;
	let fdt = image.locate(max_size)?;
	let prop = fdt
		.find_property(Some(&node), &name)?
		.ok_or_else(|| FdtError::PropertyNotFound { path: node.clone(), name: name.clone() })?;
	let value = read_value(&prop, kind)?;

	if json {
		emit_json(&GetJson {
			path: node,
			name: prop.name.to_owned(),
			offset: prop.offset,
			len: prop.len(),
			kind: kind.label(),
			value,
		});
		return Ok(());
	}

	match value {
		ValueJson::Bytes(data) => println!("{}", hex_bytes(&data)),
		ValueJson::U32(cell) => println!("{cell} (0x{cell:08x})"),
		ValueJson::Str(text) => println!("{text}"),
	}
	Ok(())
}

fn read_value(prop: &Property<'_>, kind: ValueKind) -> Result<ValueJson> {
	let mismatch = || FdtError::PropertyType {
		name: prop.name.to_owned(),
		expected: kind.label(),
		len: prop.len(),
	};

	match kind {
		ValueKind::Bytes => Ok(ValueJson::Bytes(prop.data.to_vec())),
		ValueKind::U32 => prop.as_u32().map(ValueJson::U32).ok_or_else(mismatch),
		ValueKind::Str => prop.as_str().map(|text| ValueJson::Str(text.to_owned())).ok_or_else(mismatch),
	}
}

#[derive(serde::Serialize)]
#[serde(untagged)]
enum ValueJson {
	Bytes(Vec<u8>),
	U32(u32),
	Str(String),
}

#[derive(serde::Serialize)]
struct GetJson {
	path: String,
	name: String,
	offset: usize,
	len: u32,
	kind: &'static str,
	value: ValueJson,
}

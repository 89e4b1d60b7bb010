use std::path::PathBuf;

use fdtq::fdt::{Image, Result, TraceEvent};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long = "max-size")]
	pub max_size: Option<u32>,
	#[arg(long)]
	pub json: bool,
}

/// Walk the first valid blob and print its nodes and properties in stream order.
///
/// Lines read before a malformed record are still printed; the error follows.
pub fn run(args: Args) -> Result<()> {
	let Args { path, max_size, json } = args;

	let image = Image::open(&path)?;
	let fdt = image.locate(max_size)?;

	if !json {
		let mut sink = |event: &TraceEvent<'_>| println!("{event}");
		return fdt.dump(&mut sink);
	}

	let mut nodes: Vec<NodeJson> = Vec::new();
	let mut sink = |event: &TraceEvent<'_>| match event {
		TraceEvent::Node { .. } => nodes.push(NodeJson {
			path: event.to_string(),
			properties: Vec::new(),
		}),
		TraceEvent::Property(prop) => {
			if let Some(node) = nodes.last_mut() {
				node.properties.push(PropertyJson {
					name: prop.name.to_owned(),
					offset: prop.offset,
					len: prop.len(),
					text: prop.printable_text().map(|text| text.into_owned()),
				});
			}
		}
	};
	fdt.dump(&mut sink)?;

	emit_json(&TreeJson {
		offset: fdt.offset(),
		total_size: fdt.total_size(),
		nodes,
	});
	Ok(())
}

#[derive(serde::Serialize)]
struct PropertyJson {
	name: String,
	offset: usize,
	len: u32,
	text: Option<String>,
}

#[derive(serde::Serialize)]
struct NodeJson {
	path: String,
	properties: Vec<PropertyJson>,
}

#[derive(serde::Serialize)]
struct TreeJson {
	offset: usize,
	total_size: u32,
	nodes: Vec<NodeJson>,
}

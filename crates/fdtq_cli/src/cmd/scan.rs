use std::path::PathBuf;

use fdtq::fdt::{Image, Result};

use crate::cmd::util::{HeaderJson, emit_json};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Skip blobs whose declared size exceeds this many bytes; 0 disables the cap.
	#[arg(long = "max-size")]
	pub max_size: Option<u32>,
	#[arg(long)]
	pub json: bool,
}

/// Locate the first valid blob and print where it is and what its header says.
pub fn run(args: Args) -> Result<()> {
	let Args { path, max_size, json } = args;

	let image = Image::open(&path)?;
	let fdt = image.locate(max_size)?;
	let header = fdt.header();

	if json {
		emit_json(&ScanJson {
			path: path.display().to_string(),
			compression: image.compression.label(),
			image_size: image.bytes().len(),
			offset: fdt.offset(),
			truncated: fdt.is_truncated(),
			header: HeaderJson::from(header),
		});
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("compression: {}", image.compression.label());
	println!("image_size: {}", image.bytes().len());
	println!("offset: 0x{:x}", fdt.offset());
	println!("truncated: {}", fdt.is_truncated());
	println!("magic: 0x{:08x}", header.magic);
	println!("total_size: {}", header.total_size);
	println!("off_dt_struct: 0x{:x}", header.off_dt_struct);
	println!("off_dt_strings: 0x{:x}", header.off_dt_strings);
	println!("off_mem_rsvmap: 0x{:x}", header.off_mem_rsvmap);
	println!("version: {}", header.version);
	println!("last_comp_version: {}", header.last_comp_version);
	println!("boot_cpuid_phys: {}", header.boot_cpuid_phys);
	println!("size_dt_strings: {}", header.size_dt_strings);
	println!("size_dt_struct: {}", header.size_dt_struct);

	Ok(())
}

#[derive(serde::Serialize)]
struct ScanJson {
	path: String,
	compression: &'static str,
	image_size: usize,
	offset: usize,
	truncated: bool,
	header: HeaderJson,
}

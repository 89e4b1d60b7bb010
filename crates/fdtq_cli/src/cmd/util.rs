use fdtq::fdt::FdtHeader;

/// Print a payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to encode json: {err}"),
	}
}

/// Render payload bytes as space-separated hex pairs.
pub(crate) fn hex_bytes(data: &[u8]) -> String {
	let mut out = String::with_capacity(data.len() * 3);
	for (index, byte) in data.iter().enumerate() {
		if index > 0 {
			out.push(' ');
		}
		out.push_str(&format!("{byte:02x}"));
	}
	out
}

#[derive(serde::Serialize)]
pub(crate) struct HeaderJson {
	magic: u32,
	total_size: u32,
	off_dt_struct: u32,
	off_dt_strings: u32,
	off_mem_rsvmap: u32,
	version: u32,
	last_comp_version: u32,
	boot_cpuid_phys: u32,
	size_dt_strings: u32,
	size_dt_struct: u32,
}

impl From<&FdtHeader> for HeaderJson {
	fn from(header: &FdtHeader) -> Self {
		Self {
			magic: header.magic,
			total_size: header.total_size,
			off_dt_struct: header.off_dt_struct,
			off_dt_strings: header.off_dt_strings,
			off_mem_rsvmap: header.off_mem_rsvmap,
			version: header.version,
			last_comp_version: header.last_comp_version,
			boot_cpuid_phys: header.boot_cpuid_phys,
			size_dt_strings: header.size_dt_strings,
			size_dt_struct: header.size_dt_struct,
		}
	}
}

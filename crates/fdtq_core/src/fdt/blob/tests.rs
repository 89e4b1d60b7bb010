use fdtq_testkit::{embed, field, patch_be32, sample_blob};

use crate::fdt::{Fdt, FdtError, HeaderFault};

#[test]
fn view_is_clipped_to_total_size() {
	let blob = sample_blob();
	let image = embed(&blob, 0, 64);
	let fdt = Fdt::new(&image).expect("blob validates");

	assert_eq!(fdt.offset(), 0);
	assert_eq!(fdt.bytes().len(), blob.len());
	assert_eq!(fdt.total_size() as usize, blob.len());
	assert!(!fdt.is_truncated());
	assert_eq!(fdt.structure_block().len(), fdt.header().size_dt_struct as usize);
	assert_eq!(fdt.strings_block().len(), fdt.header().size_dt_strings as usize);
	assert!(fdt.strings_block().starts_with(b"compatible\0"));
}

#[test]
fn opens_at_offset_inside_larger_buffer() {
	let blob = sample_blob();
	let image = embed(&blob, 13, 7);
	let fdt = Fdt::at(&image, 13).expect("blob validates at offset");
	assert_eq!(fdt.offset(), 13);
	assert_eq!(fdt.bytes(), blob.as_slice());
}

#[test]
fn truncated_buffer_yields_short_view() {
	let blob = sample_blob();
	let cut = &blob[..blob.len() - 10];
	let fdt = Fdt::new(cut).expect("header still validates");
	assert!(fdt.is_truncated());
	assert_eq!(fdt.bytes().len(), cut.len());
	assert!(fdt.strings_block().len() < fdt.header().size_dt_strings as usize);
}

#[test]
fn rejects_invalid_header_with_offset() {
	let mut blob = sample_blob();
	patch_be32(&mut blob, field::BOOT_CPUID_PHYS, 2);
	let err = Fdt::new(&blob).expect_err("boot cpu must be zero");
	assert!(matches!(
		err,
		FdtError::InvalidHeader {
			offset: 0,
			fault: HeaderFault::BootCpu { id: 2 }
		}
	));
}

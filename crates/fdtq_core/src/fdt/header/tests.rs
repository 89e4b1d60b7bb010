use fdtq_testkit::{FdtBuilder, field, patch_be32, sample_blob};

use crate::fdt::{FDT_MAGIC, FdtError, FdtHeader, HeaderFault, Validation, validate_header, validate_header_with};

fn fault_of(result: crate::fdt::Result<u32>) -> HeaderFault {
	match result {
		Err(FdtError::InvalidHeader { fault, .. }) => fault,
		other => panic!("expected header rejection, got {other:?}"),
	}
}

#[test]
fn parses_all_fields_in_order() {
	let blob = sample_blob();
	let header = FdtHeader::parse(&blob, 0).expect("header parses");
	assert_eq!(header.magic, FDT_MAGIC);
	assert_eq!(header.total_size as usize, blob.len());
	assert_eq!(header.off_mem_rsvmap, 40);
	assert_eq!(header.off_dt_struct, 56);
	assert_eq!(header.version, 17);
	assert_eq!(header.last_comp_version, 16);
	assert_eq!(header.boot_cpuid_phys, 0);
	assert_eq!(header.off_dt_strings, header.off_dt_struct + header.size_dt_struct);
	assert_eq!(header.struct_range(), 56..56 + header.size_dt_struct as usize);
}

#[test]
fn full_validation_accepts_builder_output() {
	let blob = sample_blob();
	let total = validate_header(&blob, 0, true).expect("valid header");
	assert_eq!(total as usize, blob.len());
	assert_eq!(validate_header(&blob, 0, false).expect("cheap check passes"), total);
}

#[test]
fn rejects_missing_magic_regardless_of_remaining_bytes() {
	let mut blob = sample_blob();
	patch_be32(&mut blob, field::MAGIC, FDT_MAGIC.swap_bytes());
	for full in [false, true] {
		assert_eq!(
			fault_of(validate_header(&blob, 0, full)),
			HeaderFault::BadMagic {
				found: FDT_MAGIC.swap_bytes()
			}
		);
	}

	let zeros = [0_u8; 256];
	assert!(validate_header(&zeros, 0, false).is_err());
	assert!(validate_header(&zeros, 0, true).is_err());
}

#[test]
fn rejects_total_size_bounds() {
	let mut blob = sample_blob();
	patch_be32(&mut blob, field::TOTAL_SIZE, FdtHeader::MIN_TOTAL_SIZE - 1);
	assert!(matches!(fault_of(validate_header(&blob, 0, false)), HeaderFault::TotalSize { .. }));

	patch_be32(&mut blob, field::TOTAL_SIZE, i32::MAX as u32);
	assert!(matches!(fault_of(validate_header(&blob, 0, false)), HeaderFault::TotalSize { .. }));

	patch_be32(&mut blob, field::TOTAL_SIZE, u32::MAX);
	assert!(matches!(fault_of(validate_header(&blob, 0, true)), HeaderFault::TotalSize { .. }));
}

#[test]
fn cheap_mode_ignores_versions_and_boot_cpu() {
	let mut blob = sample_blob();
	patch_be32(&mut blob, field::VERSION, 16);
	patch_be32(&mut blob, field::BOOT_CPUID_PHYS, 3);
	assert!(validate_header_with(&blob, 0, Validation::Cheap).is_ok());
	assert!(validate_header_with(&blob, 0, Validation::Full).is_err());
}

#[test]
fn full_mode_requires_exact_version_pair() {
	for (version, last_comp) in [(16, 16), (18, 16), (17, 17), (17, 2)] {
		let mut blob = sample_blob();
		patch_be32(&mut blob, field::VERSION, version);
		patch_be32(&mut blob, field::LAST_COMP_VERSION, last_comp);
		assert_eq!(
			fault_of(validate_header(&blob, 0, true)),
			HeaderFault::Version {
				version,
				last_comp_version: last_comp
			}
		);
	}
}

#[test]
fn full_mode_rejects_nonzero_boot_cpu() {
	let mut blob = sample_blob();
	patch_be32(&mut blob, field::BOOT_CPUID_PHYS, 1);
	assert_eq!(fault_of(validate_header(&blob, 0, true)), HeaderFault::BootCpu { id: 1 });
}

#[test]
fn block_offsets_must_sit_after_header_and_before_end() {
	let blob = sample_blob();
	let total = blob.len() as u32;

	for offset in [0, 40, total, total + 4] {
		let mut bad = blob.clone();
		patch_be32(&mut bad, field::OFF_DT_STRUCT, offset);
		assert!(matches!(fault_of(validate_header(&bad, 0, true)), HeaderFault::StructBlock { .. }));

		let mut bad = blob.clone();
		patch_be32(&mut bad, field::OFF_DT_STRINGS, offset);
		assert!(matches!(fault_of(validate_header(&bad, 0, true)), HeaderFault::StringsBlock { .. }));
	}
}

#[test]
fn block_size_overflow_does_not_wrap() {
	let blob = sample_blob();

	let mut bad = blob.clone();
	patch_be32(&mut bad, field::SIZE_DT_STRUCT, u32::MAX - 10);
	assert!(matches!(fault_of(validate_header(&bad, 0, true)), HeaderFault::StructBlock { .. }));

	let mut bad = blob.clone();
	patch_be32(&mut bad, field::SIZE_DT_STRINGS, u32::MAX);
	assert!(matches!(fault_of(validate_header(&bad, 0, true)), HeaderFault::StringsBlock { .. }));

	let mut bad = blob;
	let header = FdtHeader::parse(&bad, 0).expect("header parses");
	patch_be32(&mut bad, field::SIZE_DT_STRINGS, header.total_size - header.off_dt_strings + 1);
	assert!(matches!(fault_of(validate_header(&bad, 0, true)), HeaderFault::StringsBlock { .. }));
}

#[test]
fn block_may_end_exactly_at_total_size() {
	let mut blob = sample_blob();
	let header = FdtHeader::parse(&blob, 0).expect("header parses");
	patch_be32(&mut blob, field::SIZE_DT_STRINGS, header.total_size - header.off_dt_strings);
	assert!(validate_header(&blob, 0, true).is_ok());
}

#[test]
fn validates_at_nonzero_offset_and_truncation() {
	let blob = FdtBuilder::new().begin_node("").end_node().end().build();
	let mut image = vec![0_u8; 3];
	image.extend_from_slice(&blob);
	assert!(validate_header(&image, 3, true).is_ok());
	assert!(validate_header(&image, 0, true).is_err());

	assert_eq!(fault_of(validate_header(&image[..3 + 20], 3, true)), HeaderFault::Truncated);
	assert!(validate_header(&image[..3 + 8], 3, false).is_ok());
	assert_eq!(fault_of(validate_header(&image, usize::MAX, false)), HeaderFault::Truncated);
}

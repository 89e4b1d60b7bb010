use crate::fdt::FdtError;
use crate::fdt::bytes::{Cursor, align4, be32_at};

#[test]
fn reads_big_endian_words() {
	let bytes = [0xd0, 0x0d, 0xfe, 0xed, 0x00, 0x00, 0x00, 0x11];
	let mut cursor = Cursor::new(&bytes);
	assert_eq!(cursor.peek_u32_be().expect("peek"), 0xd00d_feed);
	assert_eq!(cursor.pos(), 0);
	assert_eq!(cursor.read_u32_be().expect("first"), 0xd00d_feed);
	assert_eq!(cursor.read_u32_be().expect("second"), 17);
	assert_eq!(cursor.remaining(), 0);
}

#[test]
fn short_read_reports_eof_without_advancing() {
	let bytes = [0_u8; 3];
	let mut cursor = Cursor::new(&bytes);
	let err = cursor.read_u32_be().expect_err("three bytes cannot hold a word");
	assert!(matches!(err, FdtError::UnexpectedEof { at: 0, need: 4, rem: 3 }));
	assert_eq!(cursor.pos(), 0);
}

#[test]
fn cstring_then_align_lands_on_next_word() {
	let bytes = *b"uart@0\0\0\0\0\0\x02";
	let mut cursor = Cursor::new(&bytes);
	assert_eq!(cursor.read_cstring_bytes().expect("name"), b"uart@0");
	cursor.align4().expect("padding present");
	assert_eq!(cursor.pos(), 8);
	assert_eq!(cursor.read_u32_be().expect("tag"), 2);
}

#[test]
fn unterminated_cstring_is_eof() {
	let bytes = *b"soc";
	let mut cursor = Cursor::new(&bytes);
	assert!(matches!(cursor.read_cstring_bytes(), Err(FdtError::UnexpectedEof { .. })));
}

#[test]
fn absolute_reads_are_bounded() {
	let bytes = [0, 0, 0, 9];
	assert_eq!(be32_at(&bytes, 0), Some(9));
	assert_eq!(be32_at(&bytes, 1), None);
	assert_eq!(be32_at(&bytes, usize::MAX), None);
	assert_eq!(align4(0), 0);
	assert_eq!(align4(5), 8);
	assert_eq!(align4(8), 8);
}

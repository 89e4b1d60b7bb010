/// Property read command.
pub mod get;
/// Blob locate and header command.
pub mod scan;
/// Whole-tree trace command.
pub mod tree;

mod util;

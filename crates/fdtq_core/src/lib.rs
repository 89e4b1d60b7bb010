//! Read-only locator and query engine for flattened device tree (FDT/DTB) blobs.

/// Header validation, blob scanning, structure walking, and property lookup.
pub mod fdt;

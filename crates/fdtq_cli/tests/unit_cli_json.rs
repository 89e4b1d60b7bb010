#![allow(missing_docs)]

use std::path::PathBuf;
use std::process::{Command, Output};

use fdtq_testkit::{embed, sample_blob, temp_image, zstd_compress};
use serde_json::Value;

#[test]
fn scan_json_reports_offset_and_header() {
	let image = image_with_blob("scan.bin", 21);
	let json = run_json(&["scan", &image, "--json"]);

	assert_eq!(json["offset"], 21);
	assert_eq!(json["compression"], "none");
	assert_eq!(json["truncated"], false);
	assert_eq!(json["header"]["magic"], 0xd00d_feed_u32);
	assert_eq!(json["header"]["version"], 17);
	assert_eq!(json["header"]["total_size"], sample_blob().len());
}

#[test]
fn scan_reads_zstd_images() {
	let path = temp_image("scan.bin.zst", &zstd_compress(&embed(&sample_blob(), 5, 0)));
	let json = run_json(&["scan", &path.display().to_string(), "--json"]);

	assert_eq!(json["compression"], "zstd");
	assert_eq!(json["offset"], 5);
}

#[test]
fn get_json_reads_typed_values() {
	let image = image_with_blob("get.bin", 0);

	let json = run_json(&["get", &image, "/soc/uart*", "compatible", "--as", "str", "--json"]);
	assert_eq!(json["value"], "ns16550a");
	assert_eq!(json["kind"], "string");
	assert_eq!(json["len"], 9);

	let json = run_json(&["get", &image, "/soc/uart@0", "clock-frequency", "--as", "u32", "--json"]);
	assert_eq!(json["value"], 1_843_200);

	let json = run_json(&["get", &image, "/soc/uart@0", "reg", "--json"]);
	assert_eq!(json["value"], serde_json::json!([0, 0, 0, 0, 0, 0, 1, 0]));
	assert_eq!(json["len"], 8);
}

#[test]
fn get_plain_output_is_bare_value() {
	let image = image_with_blob("get-plain.bin", 0);
	let output = run(&["get", &image, "/chosen", "bootargs", "--as", "str"]);

	assert!(output.status.success());
	assert_eq!(String::from_utf8_lossy(&output.stdout).trim_end(), "console=ttyS0");
}

#[test]
fn get_missing_property_fails() {
	let image = image_with_blob("get-missing.bin", 0);
	let output = run(&["get", &image, "/soc/uart@0", "status"]);

	assert_eq!(output.status.code(), Some(1));
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.starts_with("error: "), "unexpected stderr: {stderr}");
	assert!(stderr.contains("status"), "unexpected stderr: {stderr}");
}

#[test]
fn get_wrong_type_fails() {
	let image = image_with_blob("get-type.bin", 0);
	let output = run(&["get", &image, "/soc/uart@0", "reg", "--as", "u32"]);

	assert_eq!(output.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&output.stderr).contains("len=8"));
}

#[test]
fn tree_json_lists_nodes_in_order() {
	let image = image_with_blob("tree.bin", 3);
	let json = run_json(&["tree", &image, "--json"]);

	let paths: Vec<&str> = json["nodes"]
		.as_array()
		.expect("nodes array")
		.iter()
		.filter_map(|node| node["path"].as_str())
		.collect();
	assert_eq!(
		paths,
		vec!["/", "/soc/", "/soc/uart@0/", "/soc/uart@1000/", "/soc/spi@2000/", "/soc/spi@2000/flash@0/", "/chosen/"]
	);
	assert_eq!(json["nodes"][0]["properties"][0]["text"], "acme,board");
	assert!(json["nodes"][0]["properties"][1]["text"].is_null());
}

#[test]
fn tree_plain_output_uses_trace_lines() {
	let image = image_with_blob("tree-plain.bin", 0);
	let output = run(&["tree", &image]);

	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	let lines: Vec<&str> = stdout.lines().collect();
	assert_eq!(lines.first().copied(), Some("/"));
	assert!(lines.contains(&"  status = \"okay\""));
	assert!(lines.contains(&"  reg = [size:8]"));
}

#[test]
fn image_without_blob_fails() {
	let path = temp_image("empty.bin", &[0_u8; 512]);
	let output = run(&["scan", &path.display().to_string()]);

	assert_eq!(output.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&output.stderr).contains("no device tree blob found"));
}

fn image_with_blob(name: &str, prefix: usize) -> String {
	let path: PathBuf = temp_image(name, &embed(&sample_blob(), prefix, 64));
	path.display().to_string()
}

fn run(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_fdtq")).args(args).output().expect("command executes")
}

fn run_json(args: &[&str]) -> Value {
	let output = run(args);
	assert!(
		output.status.success(),
		"fdtq command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;
mod logger;

#[derive(Parser)]
#[command(name = "fdtq", about = "Flattened device tree locator and query tool")]
struct Cli {
	/// Raise log verbosity; repeat for more detail.
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Locate the first valid blob in an image and print its header.
	Scan(cmd::scan::Args),
	/// Read one property from the first valid blob.
	Get(cmd::get::Args),
	/// Print every node and property of the first valid blob.
	Tree(cmd::tree::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> fdtq::fdt::Result<()> {
	let cli = Cli::parse();
	logger::init(cli.verbose);

	match cli.command {
		Commands::Scan(args) => cmd::scan::run(args),
		Commands::Get(args) => cmd::get::run(args),
		Commands::Tree(args) => cmd::tree::run(args),
	}
}

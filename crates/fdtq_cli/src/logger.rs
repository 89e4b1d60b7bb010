//! Stderr sink for the `log` facade.

use log::{LevelFilter, Log, Metadata, Record};

/// Log target carrying tree trace lines.
const TREE_TARGET: &str = "fdtq::tree";

struct StderrLogger;

impl Log for StderrLogger {
	fn enabled(&self, metadata: &Metadata<'_>) -> bool {
		metadata.level() <= log::max_level()
	}

	fn log(&self, record: &Record<'_>) {
		if !self.enabled(record.metadata()) {
			return;
		}
		eprintln!("{}", render(record));
	}

	fn flush(&self) {}
}

/// Map repeated `-v` flags to a level; warnings are always shown.
pub(crate) fn level_for(verbosity: u8) -> LevelFilter {
	match verbosity {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	}
}

/// Install the stderr logger. A second call only updates the level.
pub(crate) fn init(verbosity: u8) {
	static LOGGER: StderrLogger = StderrLogger;
	let _ = log::set_logger(&LOGGER);
	log::set_max_level(level_for(verbosity));
}

fn render(record: &Record<'_>) -> String {
	// Tree lines are already formatted for humans.
	if record.target() == TREE_TARGET {
		return record.args().to_string();
	}
	format!("[{}] {}: {}", record.level(), record.target(), record.args())
}

use log::{Level, Log, Metadata, Record};
use wasm_bindgen::JsValue;

/// Options for the browser console logger.
#[derive(Clone, Copy, Debug)]
pub struct Config {
	level: Level,
	show_target: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			level: Level::Debug,
			show_target: false,
		}
	}
}

impl Config {
	pub fn with_level(mut self, level: Level) -> Self {
		self.level = level;
		self
	}

	/// Prefixes each line with the target (module or explicit `target:`) that logged it.
	pub fn prefer_target(mut self) -> Self {
		self.show_target = true;
		self
	}
}

struct ConsoleLogger(Config);

impl Log for ConsoleLogger {
	fn enabled(&self, metadata: &Metadata<'_>) -> bool {
		metadata.level() <= self.0.level
	}

	fn log(&self, record: &Record<'_>) {
		if !self.enabled(record.metadata()) {
			return;
		}
		let line = match self.0.show_target {
			true => format!("[{}] {}", record.target(), record.args()),
			false => record.args().to_string(),
		};
		let line = JsValue::from(line);
		match record.level() {
			Level::Error => web_sys::console::error_1(&line),
			Level::Warn => web_sys::console::warn_1(&line),
			Level::Info => web_sys::console::info_1(&line),
			Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
		}
	}

	fn flush(&self) {}
}

/// Routes `log` records to the browser console.
/// Does nothing if a logger has already been installed.
pub fn init(config: Config) {
	let logger = Box::new(ConsoleLogger(config));
	if log::set_boxed_logger(logger).is_ok() {
		log::set_max_level(config.level.to_level_filter());
	}
}
